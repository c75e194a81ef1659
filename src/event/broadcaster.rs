use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::events::RoomEvent;
use super::hub::SubscriberHub;
use super::subscriber::Subscriber;

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub attempted: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.attempted - self.failed
    }
}

/// Fans room events out to the room's current subscribers
///
/// Delivery is best-effort and at-most-once: nothing is retried or buffered,
/// and a subscriber that joins after a publish never sees that event.
#[derive(Clone)]
pub struct Broadcaster {
    hub: SubscriberHub,
}

impl Broadcaster {
    pub fn new(hub: SubscriberHub) -> Self {
        Self { hub }
    }

    /// Broadcasts in a detached task and returns immediately
    ///
    /// The handle is only for callers that want to wait (tests); dropping it
    /// does not stop the broadcast.
    pub fn publish(&self, event: RoomEvent) -> JoinHandle<DeliveryReport> {
        let broadcaster = self.clone();
        tokio::spawn(async move { broadcaster.deliver(event).await })
    }

    /// Delivers an event to every subscriber of its room
    ///
    /// Each write is independent. A failed write cancels and unregisters only
    /// that subscriber and never fails the broadcast.
    pub async fn deliver(&self, event: RoomEvent) -> DeliveryReport {
        let room_id = event.room_id;
        let subscribers = self.hub.snapshot(room_id).await;

        if subscribers.is_empty() {
            warn!(room_id = %room_id, kind = event.kind(), "No subscribers on room id");
            return DeliveryReport::default();
        }

        let wire = match event.to_wire() {
            Ok(wire) => wire,
            Err(e) => {
                error!(room_id = %room_id, kind = event.kind(), error = %e, "Failed to encode event");
                return DeliveryReport::default();
            }
        };

        let attempts = subscribers
            .iter()
            .map(|subscriber| self.deliver_to(room_id, subscriber, wire.clone()));
        let failed = join_all(attempts)
            .await
            .into_iter()
            .filter(|delivered| !delivered)
            .count();

        let report = DeliveryReport {
            attempted: subscribers.len(),
            failed,
        };

        debug!(
            room_id = %room_id,
            kind = event.kind(),
            attempted = report.attempted,
            failed = report.failed,
            "Room event broadcast"
        );

        report
    }

    async fn deliver_to(&self, room_id: Uuid, subscriber: &Subscriber, wire: String) -> bool {
        match subscriber.send_text(wire).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    room_id = %room_id,
                    subscriber_id = %subscriber.id(),
                    error = %e,
                    "failed to send message to client"
                );
                subscriber.cancel();
                self.hub.unregister(room_id, subscriber).await;
                false
            }
        }
    }
}
