use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::MessageModel;
use crate::shared::AppError;

/// Trait for message repository operations
///
/// Callers check that the room exists first; the repository does not.
#[async_trait]
pub trait MessageRepository {
    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, AppError>;
    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<MessageModel>, AppError>;
    async fn get_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<MessageModel>, AppError>;
}

/// In-memory implementation of MessageRepository for development and testing
pub struct InMemoryMessageRepository {
    // Insertion order doubles as creation order
    messages: Mutex<Vec<MessageModel>>,
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    fn messages(&self) -> Result<std::sync::MutexGuard<'_, Vec<MessageModel>>, AppError> {
        self.messages.lock().map_err(|_| {
            warn!("Message store lock poisoned");
            AppError::Unavailable("message store lock poisoned".to_string())
        })
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    #[instrument(skip(self, message))]
    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, AppError> {
        let model = MessageModel::new(room_id, message);
        let id = model.id;
        self.messages()?.push(model);

        debug!(room_id = %room_id, message_id = %id, "Message stored in memory");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<MessageModel>, AppError> {
        Ok(self
            .messages()?
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<MessageModel>, AppError> {
        Ok(self
            .messages()?
            .iter()
            .find(|m| m.room_id == room_id && m.id == message_id)
            .cloned())
    }
}

/// PostgreSQL implementation of message repository
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    #[instrument(skip(self, message))]
    async fn insert_message(&self, room_id: Uuid, message: &str) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO messages (room_id, message) VALUES ($1, $2) RETURNING id",
        )
        .bind(room_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to insert message");
            AppError::from(e)
        })?;

        debug!(room_id = %room_id, message_id = %id, "Message stored in database");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn list_room_messages(&self, room_id: Uuid) -> Result<Vec<MessageModel>, AppError> {
        sqlx::query_as::<_, MessageModel>(
            "SELECT id, room_id, message, reaction_count, answered, created_at \
             FROM messages WHERE room_id = $1 ORDER BY created_at, id",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, room_id = %room_id, "Failed to list room messages");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn get_message(
        &self,
        room_id: Uuid,
        message_id: Uuid,
    ) -> Result<Option<MessageModel>, AppError> {
        sqlx::query_as::<_, MessageModel>(
            "SELECT id, room_id, message, reaction_count, answered, created_at \
             FROM messages WHERE room_id = $1 AND id = $2",
        )
        .bind(room_id)
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, message_id = %message_id, "Failed to fetch message");
            AppError::from(e)
        })
    }
}
