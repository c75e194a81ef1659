use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;
use uuid::Uuid;

use ama::{
    build_router,
    message::repository::InMemoryMessageRepository,
    room::repository::InMemoryRoomRepository,
    AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

const WAIT: Duration = Duration::from_secs(2);

/// A real server on an ephemeral port, backed by in-memory stores
pub struct TestServer {
    pub state: AppState,
    pub router: Router,
    pub addr: SocketAddr,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start() -> Self {
        let state = AppState::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(InMemoryMessageRepository::new()),
        );
        let router = build_router(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = state.shutdown.clone();
        let app = router.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
                .unwrap()
        });

        Self {
            state,
            router,
            addr,
        }
    }

    async fn post_json(&self, uri: String, body: serde_json::Value) -> serde_json::Value {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn id_of(value: &serde_json::Value) -> Uuid {
        Uuid::parse_str(value["id"].as_str().unwrap()).unwrap()
    }

    pub async fn create_room(&self, theme: &str) -> Uuid {
        let created = self
            .post_json("/api/rooms".to_string(), serde_json::json!({ "theme": theme }))
            .await;
        Self::id_of(&created)
    }

    pub async fn post_message(&self, room_id: Uuid, message: &str) -> Uuid {
        let created = self
            .post_json(
                format!("/api/rooms/{}/messages", room_id),
                serde_json::json!({ "message": message }),
            )
            .await;
        Self::id_of(&created)
    }

    /// Opens a WebSocket on the room and waits until the hub has registered it
    pub async fn subscribe(&self, room_id: Uuid) -> TestClient {
        let before = self.state.hub.subscriber_count(room_id).await;
        let url = format!("ws://{}/subscribe/{}", self.addr, room_id);
        let (stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();

        self.wait_for_subscribers(room_id, before + 1).await;
        TestClient { stream }
    }

    pub async fn wait_for_subscribers(&self, room_id: Uuid, expected: usize) {
        tokio::time::timeout(WAIT, async {
            while self.state.hub.subscriber_count(room_id).await != expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("room {} never reached {} subscribers", room_id, expected));
    }
}

/// Client side of a subscription
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[allow(dead_code)]
impl TestClient {
    /// Next text frame, or None if nothing arrives within `wait`
    pub async fn next_text_within(&mut self, wait: Duration) -> Option<String> {
        loop {
            match tokio::time::timeout(wait, self.stream.next()).await {
                Ok(Some(Ok(Message::Text(text)))) => return Some(text),
                Ok(Some(Ok(Message::Ping(_)))) | Ok(Some(Ok(Message::Pong(_)))) => continue,
                _ => return None,
            }
        }
    }

    pub async fn next_text(&mut self) -> Option<String> {
        self.next_text_within(WAIT).await
    }

    /// True once the server has closed the socket
    pub async fn is_closed_by_server(&mut self) -> bool {
        match tokio::time::timeout(WAIT, self.stream.next()).await {
            Ok(None) | Ok(Some(Ok(Message::Close(_)))) | Ok(Some(Err(_))) => true,
            _ => false,
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.send(Message::Close(None)).await;
    }
}
