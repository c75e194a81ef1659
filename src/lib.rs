// Library crate for the AMA server
// This file exposes the public API for integration tests

pub mod config;
pub mod event;
pub mod message;
pub mod room;
pub mod server;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use event::{Broadcaster, EventPayload, RoomEvent, Subscriber, SubscriberHub, SubscriberSink};
pub use server::build_router;
pub use shared::{AppError, AppState};
