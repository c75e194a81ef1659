use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{
    service::MessageService,
    types::{MessageCreateRequest, MessageCreatedResponse, MessageResponse},
};
use crate::shared::{parse_id, AppError, AppState};

fn service(state: &AppState) -> MessageService {
    MessageService::new(
        Arc::clone(&state.room_repository),
        Arc::clone(&state.message_repository),
        state.broadcaster.clone(),
    )
}

/// HTTP handler for posting a message to a room
///
/// POST /api/rooms/:room_id/messages
/// Responds once the message is stored; subscribers are notified afterwards
#[instrument(name = "create_room_message", skip(state, request))]
pub async fn create_room_message(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<MessageCreateRequest>,
) -> Result<Json<MessageCreatedResponse>, AppError> {
    let room_id = parse_id(&room_id, "room id")?;
    let created = service(&state).create_message(room_id, request).await?;

    Ok(Json(created))
}

/// GET /api/rooms/:room_id/messages
#[instrument(name = "list_room_messages", skip(state))]
pub async fn list_room_messages(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let room_id = parse_id(&room_id, "room id")?;
    let messages = service(&state).list_messages(room_id).await?;

    Ok(Json(messages))
}

/// GET /api/rooms/:room_id/messages/:message_id
#[instrument(name = "get_room_message", skip(state))]
pub async fn get_room_message(
    State(state): State<AppState>,
    Path((room_id, message_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let room_id = parse_id(&room_id, "room id")?;
    let message_id = parse_id(&message_id, "message id")?;
    let message = service(&state).get_message(room_id, message_id).await?;

    Ok(Json(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::repository::MessageRepository;
    use crate::room::repository::RoomRepository;
    use crate::shared::test_utils::{AppStateBuilder, FailingMessageRepository};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`
    use uuid::Uuid;

    fn app(state: AppState) -> Router {
        Router::new()
            .route(
                "/api/rooms/:room_id/messages",
                post(create_room_message).get(list_room_messages),
            )
            .route(
                "/api/rooms/:room_id/messages/:message_id",
                get(get_room_message),
            )
            .with_state(state)
    }

    fn post_message(room_id: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/rooms/{}/messages", room_id))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: String) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_message_handler() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_repository.create_room("demo").await.unwrap();

        let response = app(state.clone())
            .oneshot(post_message(&room_id.to_string(), r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let created: MessageCreatedResponse = json_body(response).await;
        let stored = state
            .message_repository
            .get_message(room_id, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.message, "hello");
    }

    #[tokio::test]
    async fn test_create_long_message() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_repository.create_room("demo").await.unwrap();
        let long = "?".repeat(300);

        let response = app(state.clone())
            .oneshot(post_message(
                &room_id.to_string(),
                &serde_json::json!({ "message": long }).to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let created: MessageCreatedResponse = json_body(response).await;
        let stored = state
            .message_repository
            .get_message(room_id, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.message.len(), 300);
    }

    #[tokio::test]
    async fn test_create_message_invalid_room_id() {
        let state = AppStateBuilder::new().build();

        let response = app(state)
            .oneshot(post_message("not-a-uuid", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_message_unknown_room() {
        let state = AppStateBuilder::new().build();

        let response = app(state)
            .oneshot(post_message(
                &Uuid::new_v4().to_string(),
                r#"{"message": "hello"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_message_malformed_json() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_repository.create_room("demo").await.unwrap();

        let response = app(state.clone())
            .oneshot(post_message(&room_id.to_string(), r#"{"message": "#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state
            .message_repository
            .list_room_messages(room_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_message_store_failure() {
        let state = AppStateBuilder::new()
            .with_message_repository(Arc::new(FailingMessageRepository))
            .build();
        let room_id = state.room_repository.create_room("demo").await.unwrap();

        let response = app(state)
            .oneshot(post_message(&room_id.to_string(), r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_and_get_messages() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_repository.create_room("demo").await.unwrap();
        let first = state
            .message_repository
            .insert_message(room_id, "first")
            .await
            .unwrap();
        state
            .message_repository
            .insert_message(room_id, "second")
            .await
            .unwrap();

        let response = app(state.clone())
            .oneshot(get_request(format!("/api/rooms/{}/messages", room_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let messages: Vec<MessageResponse> = json_body(response).await;
        let texts: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);

        let response = app(state)
            .oneshot(get_request(format!(
                "/api/rooms/{}/messages/{}",
                room_id, first
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let message: MessageResponse = json_body(response).await;
        assert_eq!(message.id, first);
        assert_eq!(message.room_id, room_id);
    }

    #[tokio::test]
    async fn test_get_message_invalid_message_id() {
        let state = AppStateBuilder::new().build();
        let room_id = state.room_repository.create_room("demo").await.unwrap();

        let response = app(state)
            .oneshot(get_request(format!("/api/rooms/{}/messages/nope", room_id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_messages_unknown_room() {
        let state = AppStateBuilder::new().build();

        let response = app(state)
            .oneshot(get_request(format!(
                "/api/rooms/{}/messages",
                Uuid::new_v4()
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
