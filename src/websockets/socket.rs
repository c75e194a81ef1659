use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::sink::SinkExt;
use futures::stream::SplitSink;
use tokio::sync::Mutex;

use crate::event::{DeliveryError, SubscriberSink};

/// Outbound half of an axum WebSocket, shared between the lifecycle and broadcasts
///
/// The mutex serializes writes to this one socket only; other subscribers
/// are never blocked by it.
pub struct WebSocketSink {
    sink: Mutex<SplitSink<WebSocket, Message>>,
}

impl WebSocketSink {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl SubscriberSink for WebSocketSink {
    async fn send_text(&self, message: String) -> Result<(), DeliveryError> {
        self.sink
            .lock()
            .await
            .send(Message::Text(message))
            .await
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))
    }

    async fn close(&self) -> Result<(), DeliveryError> {
        let mut sink = self.sink.lock().await;
        // The peer may already be gone; a failed close frame is expected then
        let _ = sink.send(Message::Close(None)).await;
        sink.close()
            .await
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))
    }
}
