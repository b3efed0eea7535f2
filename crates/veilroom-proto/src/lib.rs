//! Veilroom wire protocol.
//!
//! JSON frames exchanged with the relay over the WebSocket connection. The
//! relay routes frames by room code without inspecting them; everything
//! confidential inside a frame is already sealed by `veilroom-crypto` before
//! it reaches this layer.
//!
//! Inbound frames are decoded as a strict tagged union: every known shape is
//! an explicit variant, and anything that matches none of them is a
//! [`ProtocolError`] rather than a silent fall-through.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod frame;

pub use error::ProtocolError;
pub use frame::{ClientFrame, FileAnnouncement, ServerFrame, UploadGrant, WireEnvelope};
