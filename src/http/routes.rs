//! HTTP routes: room creation, room summary, health.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::conn::ConnectionTable;
use crate::error::GameError;
use crate::judge::AutoJudge;
use crate::room::registry::RoomRegistry;
use crate::room::state::{RoomConfig, RoomPhase};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub bindings: Arc<ConnectionTable>,
    /// Optional automated judge used when a round deadline elapses.
    pub auto_judge: Option<Arc<dyn AutoJudge>>,
}

pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub min_players: Option<usize>,
    #[serde(default)]
    pub score_limit: Option<u32>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub round_time_limit_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
}

pub async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, (StatusCode, String)> {
    let defaults = RoomConfig::default();
    let config = RoomConfig {
        min_players: req.min_players.unwrap_or(defaults.min_players),
        score_limit: req.score_limit.unwrap_or(defaults.score_limit),
        max_rounds: req.max_rounds.unwrap_or(defaults.max_rounds),
        round_time_limit: req
            .round_time_limit_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.round_time_limit),
    };
    let session = state
        .registry
        .create_room(config)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(CreateRoomResponse {
        room_id: session.id().to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct RoomSummary {
    pub room_id: String,
    pub state: RoomPhase,
    pub round: u32,
    pub players: std::collections::BTreeMap<String, u32>,
    pub spectators: Vec<String>,
    pub game_winner: Option<String>,
}

pub async fn room_summary(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RoomSummary>, (StatusCode, String)> {
    match state.registry.get_room(&id) {
        Ok(session) => {
            let snap = session.snapshot();
            Ok(Json(RoomSummary {
                room_id: snap.id,
                state: snap.phase,
                round: snap.round,
                players: snap.players,
                spectators: snap.spectators,
                game_winner: snap.game_winner,
            }))
        }
        Err(err @ GameError::RoomNotFound(_)) => Err((StatusCode::NOT_FOUND, err.to_string())),
        Err(err) => Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string())),
    }
}
