use axum::{
    http::{header, HeaderName, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::time::Duration;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::message::{create_room_message, get_room_message, list_room_messages};
use crate::room::{create_room, list_rooms};
use crate::shared::{AppError, AppState};
use crate::websockets::subscribe_handler;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .max_age(Duration::from_secs(300))
}

/// Turns a handler panic into a 500 instead of a dropped connection
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Handler panicked");

    AppError::Internal.into_response()
}

/// Builds the full application router
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/subscribe/:room_id", get(subscribe_handler))
        .route("/api/rooms", post(create_room).get(list_rooms))
        .route(
            "/api/rooms/:room_id/messages",
            post(create_room_message).get(list_room_messages),
        )
        .route(
            "/api/rooms/:room_id/messages/:message_id",
            get(get_room_message),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
