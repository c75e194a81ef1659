use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Failure to write to one subscriber's connection
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Outbound half of a subscriber's connection
///
/// The hub and broadcaster only ever push text frames through this; reading
/// and closing stay with the connection lifecycle that owns the transport.
#[async_trait]
pub trait SubscriberSink: Send + Sync {
    async fn send_text(&self, message: String) -> Result<(), DeliveryError>;

    /// Releases the transport once the subscriber has left its room
    async fn close(&self) -> Result<(), DeliveryError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One connection watching one room, paired with its stop signal
///
/// Clones share the sink and the token, so cancelling a clone taken from a
/// hub snapshot stops the original connection.
#[derive(Clone)]
pub struct Subscriber {
    id: SubscriberId,
    sink: Arc<dyn SubscriberSink>,
    token: CancellationToken,
}

impl Subscriber {
    pub fn new(sink: Arc<dyn SubscriberSink>, token: CancellationToken) -> Self {
        Self {
            id: SubscriberId::new(),
            sink,
            token,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Triggers this subscriber's stop signal. Repeated calls have no effect.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn send_text(&self, message: String) -> Result<(), DeliveryError> {
        self.sink.send_text(message).await
    }

    pub async fn close(&self) -> Result<(), DeliveryError> {
        self.sink.close().await
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl PartialEq for Subscriber {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Subscriber {}
