use axum::extract::ws::Message;
use futures::stream::{Stream, StreamExt};
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::{Subscriber, SubscriberHub};

/// How long a close may wait behind an in-flight write before the transport is dropped
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Why a connection left its room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReason {
    /// The client sent a close frame or the stream ended
    ClientClosed,
    /// Reading from the client failed
    ReadFailed,
    /// The token fired from elsewhere: a failed delivery or server shutdown
    Cancelled,
}

/// One subscriber connection, from joining its room until the transport is released
pub struct Connection {
    room_id: Uuid,
    subscriber: Subscriber,
    hub: SubscriberHub,
}

impl Connection {
    pub fn new(room_id: Uuid, subscriber: Subscriber, hub: SubscriberHub) -> Self {
        Self {
            room_id,
            subscriber,
            hub,
        }
    }

    /// Registers with the hub, waits for the subscriber's token, then cleans up
    ///
    /// Inbound frames are only watched to notice the client going away; their
    /// content is ignored. Whatever ends the wait, the subscriber's token is
    /// fired, it is removed from the hub, and the transport is closed.
    pub async fn run<S, E>(self, mut inbound: S) -> LeaveReason
    where
        S: Stream<Item = Result<Message, E>> + Unpin + Send,
        E: Display + Send,
    {
        let room_id = self.room_id;
        let subscriber_id = self.subscriber.id();
        let token = self.subscriber.token().clone();

        self.hub.register(room_id, self.subscriber.clone()).await;
        info!(room_id = %room_id, subscriber_id = %subscriber_id, "new client connected");

        let reason = loop {
            tokio::select! {
                _ = token.cancelled() => break LeaveReason::Cancelled,

                frame = inbound.next() => match frame {
                    Some(Ok(Message::Close(_))) | None => break LeaveReason::ClientClosed,
                    Some(Ok(Message::Text(text))) => {
                        debug!(
                            room_id = %room_id,
                            subscriber_id = %subscriber_id,
                            bytes = text.len(),
                            "Ignoring inbound message"
                        );
                    }
                    Some(Ok(_)) => {} // ping/pong/binary
                    Some(Err(e)) => {
                        warn!(
                            room_id = %room_id,
                            subscriber_id = %subscriber_id,
                            error = %e,
                            "WebSocket read failed"
                        );
                        break LeaveReason::ReadFailed;
                    }
                }
            }
        };

        self.subscriber.cancel();
        self.hub.unregister(room_id, &self.subscriber).await;
        info!(
            room_id = %room_id,
            subscriber_id = %subscriber_id,
            reason = ?reason,
            "client disconnected"
        );

        match tokio::time::timeout(CLOSE_TIMEOUT, self.subscriber.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(subscriber_id = %subscriber_id, error = %e, "Close after leave failed");
            }
            Err(_) => {
                warn!(subscriber_id = %subscriber_id, "Close timed out, releasing transport");
            }
        }

        reason
    }
}
