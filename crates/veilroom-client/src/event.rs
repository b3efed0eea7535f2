//! Session events and actions.

use veilroom_proto::{ClientFrame, FileAnnouncement, ServerFrame};

/// Events the caller feeds into the session.
///
/// The caller is responsible for:
/// - Receiving frames from the relay and forwarding them in arrival order
/// - Forwarding user intents (send message, send file, download)
/// - Executing blob transfers and reporting their completion
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Relay connection established.
    Connected,

    /// Relay connection lost.
    ///
    /// Terminal for the session: there is no reconnect path, and further
    /// send events become no-ops.
    Disconnected,

    /// Frame received from the relay.
    FrameReceived(ServerFrame),

    /// User wants to send a text message.
    SendMessage {
        /// Message text; leading/trailing whitespace is trimmed.
        text: String,
    },

    /// User wants to share a file with the room.
    SendFile {
        /// Filename to announce.
        name: String,
        /// Raw file contents.
        bytes: Vec<u8>,
    },

    /// The upload requested via [`SessionAction::UploadBlob`] succeeded.
    BlobUploaded,

    /// The upload requested via [`SessionAction::UploadBlob`] failed.
    UploadFailed {
        /// Transport diagnostic.
        reason: String,
    },

    /// User asked to download an announced file.
    DownloadFile {
        /// The announcement being acted on.
        record: FileAnnouncement,
    },

    /// The fetch requested via [`SessionAction::FetchBlob`] completed.
    BlobFetched {
        /// The announcement the fetch was for.
        record: FileAnnouncement,
        /// Raw ciphertext bytes from the blob store.
        bytes: Vec<u8>,
    },
}

/// Actions the session produces for the caller to execute.
///
/// The delivery variants (`DeliverMessage`, `DeliverFile`, `SystemNotice`,
/// `ParticipantCount`, `SaveFile`) are the UI collaborator surface; the
/// rest instruct the caller to perform I/O and feed the result back as an
/// event.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Send a frame to the relay.
    Send(ClientFrame),

    /// PUT `body` to the presigned URL, then report
    /// [`SessionEvent::BlobUploaded`] or [`SessionEvent::UploadFailed`].
    UploadBlob {
        /// Presigned PUT target.
        presign_url: String,
        /// Ciphertext blob to upload.
        body: Vec<u8>,
    },

    /// GET the record's retrieval URL, then report
    /// [`SessionEvent::BlobFetched`].
    FetchBlob {
        /// The announcement whose blob to fetch.
        record: FileAnnouncement,
    },

    /// Offer decrypted file bytes for local save.
    SaveFile {
        /// Original filename.
        name: String,
        /// Decrypted file contents.
        bytes: Vec<u8>,
    },

    /// Render a chat message.
    DeliverMessage {
        /// Sender alias.
        sender: String,
        /// Message text.
        text: String,
        /// True when this session authored the message (optimistic echo).
        mine: bool,
    },

    /// Render a file card with a download affordance.
    DeliverFile {
        /// The file announcement to render.
        record: FileAnnouncement,
        /// True when this session announced the file.
        mine: bool,
    },

    /// Render a relay system notice.
    SystemNotice {
        /// Notice text.
        text: String,
    },

    /// Update the participant-count display.
    ParticipantCount {
        /// Number of connected participants.
        value: u32,
    },
}
