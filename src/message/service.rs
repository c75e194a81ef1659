use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    repository::MessageRepository,
    types::{MessageCreateRequest, MessageCreatedResponse, MessageResponse},
};
use crate::event::{Broadcaster, RoomEvent};
use crate::room::{repository::RoomRepository, RoomService};
use crate::shared::AppError;

/// Service for room messages; the only producer of room events today
pub struct MessageService {
    rooms: RoomService,
    repository: Arc<dyn MessageRepository + Send + Sync>,
    broadcaster: Broadcaster,
}

impl MessageService {
    pub fn new(
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        repository: Arc<dyn MessageRepository + Send + Sync>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            rooms: RoomService::new(room_repository),
            repository,
            broadcaster,
        }
    }

    /// Stores a message and notifies the room's subscribers
    ///
    /// The broadcast runs detached, so the result only reflects persistence.
    #[instrument(skip(self, request))]
    pub async fn create_message(
        &self,
        room_id: Uuid,
        request: MessageCreateRequest,
    ) -> Result<MessageCreatedResponse, AppError> {
        self.rooms.ensure_room_exists(room_id).await?;

        let id = self
            .repository
            .insert_message(room_id, &request.message)
            .await?;

        info!(room_id = %room_id, message_id = %id, "Message created");

        self.broadcaster
            .publish(RoomEvent::message_created(room_id, id, request.message));

        Ok(MessageCreatedResponse { id })
    }

    #[instrument(skip(self))]
    pub async fn list_messages(&self, room_id: Uuid) -> Result<Vec<MessageResponse>, AppError> {
        self.rooms.ensure_room_exists(room_id).await?;

        let messages = self.repository.list_room_messages(room_id).await?;
        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<MessageResponse, AppError> {
        self.rooms.ensure_room_exists(room_id).await?;

        self.repository
            .get_message(room_id, message_id)
            .await?
            .map(MessageResponse::from)
            .ok_or_else(|| AppError::NotFound("message not found".to_string()))
    }
}
