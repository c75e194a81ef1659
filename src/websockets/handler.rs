use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::stream::StreamExt;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::event::Subscriber;
use crate::room::RoomService;
use crate::shared::{parse_id, AppError, AppState};

use super::connection::Connection;
use super::socket::WebSocketSink;

/// WebSocket endpoint for watching a room
///
/// GET /subscribe/:room_id
/// The room is checked before the upgrade, so a bad or unknown id gets a
/// plain HTTP error instead of a socket.
#[instrument(name = "subscribe", skip(state, ws))]
pub async fn subscribe_handler(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, AppError> {
    let room_id = parse_id(&room_id, "room id")?;

    RoomService::new(Arc::clone(&state.room_repository))
        .ensure_room_exists(room_id)
        .await?;

    let ws = ws.map_err(|e| {
        warn!(room_id = %room_id, error = %e, "failed to upgrade conn");
        AppError::UpgradeFailure("could not upgrade connection to websocket".to_string())
    })?;

    info!(room_id = %room_id, "Room verified, establishing WebSocket connection");

    Ok(ws
        .on_failed_upgrade(move |e| {
            warn!(room_id = %room_id, error = %e, "WebSocket upgrade failed after response");
        })
        .on_upgrade(move |socket| handle_subscription(socket, room_id, state)))
}

/// Runs one subscriber connection on the upgraded socket
async fn handle_subscription(socket: WebSocket, room_id: Uuid, state: AppState) {
    let (sink, stream) = socket.split();
    let subscriber = Subscriber::new(
        Arc::new(WebSocketSink::new(sink)),
        state.shutdown.child_token(),
    );

    Connection::new(room_id, subscriber, state.hub.clone())
        .run(stream)
        .await;
}
