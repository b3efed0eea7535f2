//! Veilroom client.
//!
//! Action-based session state machine for the Veilroom protocol: one
//! end-to-end encrypted chat room, keyed by a shared symmetric key that
//! arrives out-of-band in the invite-URL fragment and rotates forward after
//! every twenty sent messages.
//!
//! # Architecture
//!
//! The client is Sans-IO. A [`Session`] receives events ([`SessionEvent`]),
//! processes them through pure state machine logic, and returns actions
//! ([`SessionAction`]) for the caller to execute: frames to send, blobs to
//! move, messages and file cards to render. Network completions come back
//! as events, so every suspension point is explicit and all frames are
//! handled strictly in arrival order by one dispatch loop.
//!
//! # Components
//!
//! - [`Session`]: per-room state machine (keys, rotation, file transfers)
//! - [`SessionEvent`] / [`SessionAction`]: the event/action surface
//! - [`Environment`]: randomness source, swappable for deterministic tests
//! - [`invite`]: room codes and join-URL handling
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedRelay`]: WebSocket relay connection
//! - [`blob::BlobStore`]: presigned-URL blob store collaborator

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
mod error;
mod event;
pub mod invite;
mod session;

#[cfg(feature = "transport")]
pub mod blob;
#[cfg(feature = "transport")]
pub mod transport;

pub use env::{Environment, SystemEnv};
pub use error::{InviteError, SessionError};
pub use event::{SessionAction, SessionEvent};
pub use session::{ConnectionState, ROTATION_THRESHOLD, RoomIdentity, Session};
