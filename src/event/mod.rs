// Room-scoped publish/subscribe
//
// Events describe things that happened in a room. The hub tracks which
// connections are watching which room, and the broadcaster fans events out
// to them.

// Public API - what other modules can use
pub use broadcaster::{Broadcaster, DeliveryReport};
pub use events::{EventPayload, RoomEvent};
pub use hub::SubscriberHub;
pub use subscriber::{DeliveryError, Subscriber, SubscriberId, SubscriberSink};

// Internal modules
mod broadcaster;
mod events;
mod hub;
mod subscriber;
