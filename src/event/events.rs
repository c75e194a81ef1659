use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind-specific body of a room event
///
/// Serialized adjacently tagged, so a `MessageCreated` goes over the wire as
/// `{"kind":"message_created","value":{"id":"...","message":"..."}}`.
/// New event kinds are added as new variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventPayload {
    /// A message was posted to the room
    MessageCreated { id: Uuid, message: String },
}

impl EventPayload {
    /// The wire tag for this payload
    pub fn kind(&self) -> &'static str {
        match self {
            EventPayload::MessageCreated { .. } => "message_created",
        }
    }
}

/// Something that happened in a room
///
/// The room id only routes the event; subscribers never see it because
/// the connection they receive on already implies the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomEvent {
    pub room_id: Uuid,
    pub payload: EventPayload,
}

impl RoomEvent {
    pub fn message_created(room_id: Uuid, id: Uuid, message: impl Into<String>) -> Self {
        Self {
            room_id,
            payload: EventPayload::MessageCreated {
                id,
                message: message.into(),
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        self.payload.kind()
    }

    /// Encodes the event in the form delivered to subscribers
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.payload)
    }
}
