use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    repository::RoomRepository,
    types::{RoomCreateRequest, RoomCreatedResponse, RoomResponse},
};
use crate::shared::AppError;

/// Service for handling room business logic
pub struct RoomService {
    repository: Arc<dyn RoomRepository + Send + Sync>,
}

impl RoomService {
    pub fn new(repository: Arc<dyn RoomRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a new room for the given theme
    #[instrument(skip(self))]
    pub async fn create_room(
        &self,
        request: RoomCreateRequest,
    ) -> Result<RoomCreatedResponse, AppError> {
        let id = self.repository.create_room(&request.theme).await?;

        info!(room_id = %id, theme = %request.theme, "Room created successfully");

        Ok(RoomCreatedResponse { id })
    }

    /// Lists all rooms
    #[instrument(skip(self))]
    pub async fn list_rooms(&self) -> Result<Vec<RoomResponse>, AppError> {
        let rooms = self.repository.list_rooms().await?;
        debug!(room_count = rooms.len(), "Rooms retrieved successfully");

        Ok(rooms.into_iter().map(RoomResponse::from).collect())
    }

    /// Fails with `NotFound` unless the room exists
    #[instrument(skip(self))]
    pub async fn ensure_room_exists(&self, room_id: Uuid) -> Result<(), AppError> {
        if self.repository.room_exists(room_id).await? {
            Ok(())
        } else {
            warn!(room_id = %room_id, "Room not found");
            Err(AppError::NotFound("invalid room id".to_string()))
        }
    }
}
