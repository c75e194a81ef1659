use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use ama::event::{DeliveryError, SubscriberSink};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Sink that records every frame it is asked to send
#[derive(Clone, Default)]
pub struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriberSink for RecordingSink {
    async fn send_text(&self, message: String) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Sink whose every write fails, like a peer that went away mid-broadcast
#[derive(Clone, Default)]
pub struct FailingSink;

#[async_trait]
impl SubscriberSink for FailingSink {
    async fn send_text(&self, _message: String) -> Result<(), DeliveryError> {
        Err(DeliveryError::SendFailed("broken pipe".to_string()))
    }
}
