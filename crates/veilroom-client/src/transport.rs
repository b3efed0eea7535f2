//! WebSocket relay transport.
//!
//! Thin I/O layer bridging the relay socket to frame channels. Protocol
//! logic stays in the sans-IO [`Session`](crate::Session); this module only
//! moves frames and enforces strict decoding at the boundary.
//!
//! Connection loss is terminal: the channels close and the session's driver
//! should feed it a `Disconnected` event. No reconnect or backoff exists.

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, warn};
use veilroom_proto::{ClientFrame, ServerFrame};

/// Depth of the frame channels in each direction.
const CHANNEL_CAPACITY: usize = 32;

type RelaySocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Handle to a connected relay.
///
/// Frames are exchanged via the channels; an internal task owns the socket.
/// `from_relay` closes when the connection drops.
pub struct ConnectedRelay {
    /// Send frames to the relay.
    pub to_relay: mpsc::Sender<ClientFrame>,

    /// Receive frames from the relay, in strict arrival order.
    pub from_relay: mpsc::Receiver<ServerFrame>,

    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedRelay {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Connect to the relay endpoint, joining `room_code`.
///
/// The room code rides in the query string; it routes frames and is the
/// only thing the relay learns about the room.
pub async fn connect(relay_url: &str, room_code: &str) -> Result<ConnectedRelay, TransportError> {
    let url = format!("{relay_url}?room={room_code}");
    let (socket, _response) =
        connect_async(url).await.map_err(|e| TransportError::Connection(e.to_string()))?;

    let (to_relay_tx, to_relay_rx) = mpsc::channel::<ClientFrame>(CHANNEL_CAPACITY);
    let (from_relay_tx, from_relay_rx) = mpsc::channel::<ServerFrame>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_connection(socket, to_relay_rx, from_relay_tx));

    Ok(ConnectedRelay {
        to_relay: to_relay_tx,
        from_relay: from_relay_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the socket.
async fn run_connection(
    socket: RelaySocket,
    mut to_relay: mpsc::Receiver<ClientFrame>,
    from_relay: mpsc::Sender<ServerFrame>,
) {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outbound = to_relay.recv() => {
                let Some(frame) = outbound else { break };
                if let Err(e) = sink.send(Message::Text(frame.encode().into())).await {
                    warn!("relay send failed: {e}");
                    break;
                }
            },
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => match ServerFrame::decode(&text) {
                        Ok(frame) => {
                            if from_relay.send(frame).await.is_err() {
                                break;
                            }
                        },
                        // Unrecognized shapes are dropped, not fatal
                        Err(e) => warn!("dropping relay frame: {e}"),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("relay connection closed");
                        break;
                    },
                    // Ping/pong handled by tungstenite; binary is not part
                    // of this protocol
                    Some(Ok(other)) => debug!("ignoring non-text relay frame: {other:?}"),
                    Some(Err(e)) => {
                        warn!("relay stream error: {e}");
                        break;
                    },
                }
            },
        }
    }
}
