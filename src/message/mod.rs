// Public API - what other modules can use
pub use handlers::{create_room_message, get_room_message, list_room_messages};
pub use service::MessageService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
