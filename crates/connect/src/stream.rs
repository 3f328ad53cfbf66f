//! WebSocket implementation of the position push channel.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;

use fleetmap_core::errors::ChannelError;
use fleetmap_core::fleet::PositionUpdate;
use fleetmap_core::live::{PositionChannel, PositionStream};

/// Position channel over a WebSocket endpoint.
///
/// Each subscription opens a fresh connection; the server pushes one JSON
/// position object per text frame. Ping/pong keepalive is handled by the
/// protocol layer. There is no subscription handshake and no resume token:
/// a lost connection simply gets a new `subscribe` call from the listener.
#[derive(Debug, Clone)]
pub struct WsPositionChannel {
    url: String,
}

impl WsPositionChannel {
    /// Create a channel for the given WebSocket URL
    /// (e.g., "ws://localhost:8080/ws/positions").
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl PositionChannel for WsPositionChannel {
    async fn subscribe(&self) -> Result<PositionStream, ChannelError> {
        let (socket, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        debug!("[WsChannel] Connected to {}", self.url);

        let stream = socket.filter_map(|frame| async move {
            match frame {
                Ok(Message::Text(text)) => decode_position_frame(&text).map(Ok),
                Ok(_) => None,
                Err(e) => Some(Err(ChannelError::Transport(e.to_string()))),
            }
        });
        Ok(stream.boxed())
    }
}

/// Decode one text frame into a position update.
///
/// Frames that fail to parse are dropped with a warning instead of killing
/// the subscription; the next snapshot poll covers whatever they carried.
fn decode_position_frame(frame: &str) -> Option<PositionUpdate> {
    match serde_json::from_str::<PositionUpdate>(frame) {
        Ok(update) => Some(update),
        Err(e) => {
            warn!("[WsChannel] Ignoring unparseable frame: {}", e);
            None
        }
    }
}
