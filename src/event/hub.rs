use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::subscriber::{Subscriber, SubscriberId};

#[derive(Default)]
struct Registry {
    /// room_id -> bucket of subscribers. Buckets are created on first
    /// registration and left in place (possibly empty) afterwards.
    rooms: HashMap<Uuid, HashMap<SubscriberId, Subscriber>>,
    /// subscriber -> the one room it is registered in
    memberships: HashMap<SubscriberId, Uuid>,
}

/// Registry of live subscribers per room
///
/// The lock only ever guards bucket mutation and snapshot copies. Nothing
/// writes to a connection while holding it; delivery works on the owned
/// `Vec` returned by [`SubscriberHub::snapshot`].
#[derive(Clone, Default)]
pub struct SubscriberHub {
    registry: Arc<RwLock<Registry>>,
}

impl SubscriberHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber to a room's bucket, creating the bucket if needed
    ///
    /// A subscriber already registered in a different room is moved, so it
    /// is never in two buckets at once. Subscribers whose token has already
    /// fired are not added.
    pub async fn register(&self, room_id: Uuid, subscriber: Subscriber) {
        if subscriber.is_cancelled() {
            debug!(
                room_id = %room_id,
                subscriber_id = %subscriber.id(),
                "Skipping registration of cancelled subscriber"
            );
            return;
        }

        let mut registry = self.registry.write().await;
        let subscriber_id = subscriber.id();

        if let Some(previous_room) = registry.memberships.insert(subscriber_id, room_id) {
            if previous_room != room_id {
                if let Some(bucket) = registry.rooms.get_mut(&previous_room) {
                    bucket.remove(&subscriber_id);
                }
            }
        }

        let bucket = registry.rooms.entry(room_id).or_default();
        bucket.insert(subscriber_id, subscriber);

        debug!(
            room_id = %room_id,
            subscriber_id = %subscriber_id,
            room_subscribers = bucket.len(),
            "Subscriber registered"
        );
    }

    /// Removes a subscriber from a room's bucket. Absent subscribers are ignored.
    pub async fn unregister(&self, room_id: Uuid, subscriber: &Subscriber) {
        let mut registry = self.registry.write().await;
        let subscriber_id = subscriber.id();

        let removed = registry
            .rooms
            .get_mut(&room_id)
            .and_then(|bucket| bucket.remove(&subscriber_id))
            .is_some();

        if registry.memberships.get(&subscriber_id) == Some(&room_id) {
            registry.memberships.remove(&subscriber_id);
        }

        if removed {
            debug!(room_id = %room_id, subscriber_id = %subscriber_id, "Subscriber unregistered");
        }
    }

    /// Point-in-time copy of a room's subscribers; empty if the room has none
    pub async fn snapshot(&self, room_id: Uuid) -> Vec<Subscriber> {
        let registry = self.registry.read().await;

        registry
            .rooms
            .get(&room_id)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn subscriber_count(&self, room_id: Uuid) -> usize {
        let registry = self.registry.read().await;
        registry.rooms.get(&room_id).map_or(0, HashMap::len)
    }

    /// Number of room buckets, including empty ones
    pub async fn room_count(&self) -> usize {
        self.registry.read().await.rooms.len()
    }
}
