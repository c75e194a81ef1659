use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::MessageModel;

/// Request payload for posting a message to a room
#[derive(Debug, Deserialize)]
pub struct MessageCreateRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageCreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub room_id: Uuid,
    pub message: String,
    pub reaction_count: i64,
    pub answered: bool,
}

impl From<MessageModel> for MessageResponse {
    fn from(model: MessageModel) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            message: model.message,
            reaction_count: model.reaction_count,
            answered: model.answered,
        }
    }
}
