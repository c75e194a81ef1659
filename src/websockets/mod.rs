// Public API
pub use connection::{Connection, LeaveReason};
pub use handler::subscribe_handler;
pub use socket::WebSocketSink;

// Internal modules
mod connection;
mod handler;
mod socket;
