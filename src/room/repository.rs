use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::RoomModel;
use crate::shared::AppError;

/// Trait for room repository operations
#[async_trait]
pub trait RoomRepository {
    async fn create_room(&self, theme: &str) -> Result<Uuid, AppError>;
    async fn room_exists(&self, room_id: Uuid) -> Result<bool, AppError>;
    async fn get_room(&self, room_id: Uuid) -> Result<Option<RoomModel>, AppError>;
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError>;
}

/// In-memory implementation of RoomRepository for development and testing
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<Uuid, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn rooms(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, RoomModel>>, AppError> {
        self.rooms.lock().map_err(|_| {
            warn!("Room store lock poisoned");
            AppError::Unavailable("room store lock poisoned".to_string())
        })
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self))]
    async fn create_room(&self, theme: &str) -> Result<Uuid, AppError> {
        let room = RoomModel::new(theme);
        debug!(room_id = %room.id, "Creating room in memory");

        let id = room.id;
        self.rooms()?.insert(id, room);

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn room_exists(&self, room_id: Uuid) -> Result<bool, AppError> {
        Ok(self.rooms()?.contains_key(&room_id))
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: Uuid) -> Result<Option<RoomModel>, AppError> {
        debug!(room_id = %room_id, "Fetching room from memory");
        Ok(self.rooms()?.get(&room_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        let mut rooms: Vec<RoomModel> = self.rooms()?.values().cloned().collect();
        rooms.sort_by(|a, b| a.theme.cmp(&b.theme).then(a.id.cmp(&b.id)));
        Ok(rooms)
    }
}

/// PostgreSQL implementation of room repository
pub struct PostgresRoomRepository {
    pool: PgPool,
}

impl PostgresRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PostgresRoomRepository {
    #[instrument(skip(self))]
    async fn create_room(&self, theme: &str) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar("INSERT INTO rooms (theme) VALUES ($1) RETURNING id")
            .bind(theme)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create room in database");
                AppError::from(e)
            })?;

        debug!(room_id = %id, "Room created in database");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn room_exists(&self, room_id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM rooms WHERE id = $1)")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to check room in database");
                AppError::from(e)
            })?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn get_room(&self, room_id: Uuid) -> Result<Option<RoomModel>, AppError> {
        let room = sqlx::query_as::<_, RoomModel>("SELECT id, theme FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, room_id = %room_id, "Failed to fetch room from database");
                AppError::from(e)
            })?;

        Ok(room)
    }

    #[instrument(skip(self))]
    async fn list_rooms(&self) -> Result<Vec<RoomModel>, AppError> {
        let rooms = sqlx::query_as::<_, RoomModel>("SELECT id, theme FROM rooms ORDER BY theme, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list rooms from database");
                AppError::from(e)
            })?;

        debug!(room_count = rooms.len(), "Rooms listed from database");
        Ok(rooms)
    }
}
