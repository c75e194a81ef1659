use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for rooms table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct RoomModel {
    pub id: Uuid,
    pub theme: String,
}

impl RoomModel {
    /// Creates a new room model with a freshly generated ID
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            theme: theme.into(),
        }
    }
}
