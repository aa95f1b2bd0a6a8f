//! WebSocket connection lifecycle management.
//!
//! Each socket gets a connection id, an outbound push channel registered
//! with the room session, and a read loop that feeds the event router.
//! Closing the socket resolves the player through the binding table in one
//! lookup and marks them disconnected.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::GameError;
use crate::events::{ClientEvent, Outbound, ServerEvent};
use crate::http::routes::AppState;
use crate::room::session::RoomSession;
use crate::util::id::new_connection_id;
use crate::ws::router;

#[derive(Deserialize)]
pub struct WsParams {
    pub room_id: String,
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Query(WsParams { room_id }): Query<WsParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    match state.registry.get_room(&room_id) {
        Ok(session) => ws
            .on_upgrade(move |socket| handle_socket(state, session, socket))
            .into_response(),
        Err(err @ GameError::RoomNotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn handle_socket(state: AppState, session: Arc<RoomSession>, socket: WebSocket) {
    let conn_id = new_connection_id();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    session.attach_conn(conn_id, tx);

    // Forward server pushes to the socket until either side goes away.
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => router::route_event(&state, &session, conn_id, event),
                Err(err) => session.dispatch(&[Outbound::conn(
                    conn_id,
                    ServerEvent::Error {
                        code: "bad_message".to_string(),
                        message: format!("unparseable event: {err}"),
                    },
                )]),
            },
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    session.detach_conn(conn_id);
    if let Some(binding) = state.bindings.unbind(conn_id) {
        let applied = session.disconnect(&binding.player_name);
        router::finish(&state, &session, applied);
    }
    writer.abort();
    tracing::debug!(room_id = %session.id(), conn = %conn_id, "ws closed");
}
