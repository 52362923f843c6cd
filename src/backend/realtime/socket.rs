/**
 * WebSocket Push Handler
 *
 * `GET /ws` upgrades to a WebSocket that only ever sends. Each message is a
 * full snapshot of the visible entries:
 *
 * ```json
 * {"type": "init", "data": [ ...entries ]}
 * {"type": "update", "data": [ ...entries ]}
 * ```
 *
 * `init` goes out once right after the upgrade; `update` follows every
 * successful store write. Clients replace their list with each message.
 *
 * # Connection Management
 *
 * - The receiver is subscribed before the `init` snapshot is read, so no
 *   write can slip between the two.
 * - A lagging client skips the missed snapshots and gets the next one.
 * - Incoming frames are drained and ignored; a close frame or a send error
 *   ends the connection.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend::realtime::broadcast::RealtimeEventBroadcast;
use crate::backend::storage::StoreRepository;
use crate::shared::RealtimeEvent;

/// Handle the WebSocket upgrade (GET /ws)
pub async fn handle_socket_upgrade(
    ws: WebSocketUpgrade,
    State(repository): State<StoreRepository>,
    State(broadcast_tx): State<RealtimeEventBroadcast>,
) -> Response {
    let receiver = broadcast_tx.subscribe();
    ws.on_upgrade(move |socket| serve_socket(socket, repository, receiver))
}

async fn serve_socket(
    socket: WebSocket,
    repository: StoreRepository,
    mut events: broadcast::Receiver<RealtimeEvent>,
) {
    tracing::info!("[Realtime] WebSocket client connected");
    let (mut sender, mut incoming) = socket.split();

    let init = RealtimeEvent::init(&repository.load().await);
    if send_event(&mut sender, &init).await.is_err() {
        tracing::debug!("[Realtime] Client left before init snapshot");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if send_event(&mut sender, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Client lagged, skipped {} snapshots", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = incoming.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!("[Realtime] WebSocket client disconnected");
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &RealtimeEvent,
) -> Result<(), axum::Error> {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("[Realtime] Failed to serialize event: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(payload.into())).await
}
