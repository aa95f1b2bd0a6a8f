//! Typed errors for game transitions.
//!
//! Every inbound event handler validates its guards and returns one of these
//! instead of mutating state partially. The router decides how to surface
//! them: the wire `code` goes into the `error` event sent back to the
//! originating connection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("room {0} not found")]
    RoomNotFound(String),

    #[error("player {0} is not in this room")]
    PlayerNotFound(String),

    #[error("the name {0} is already taken in this room")]
    NameAlreadyActive(String),

    #[error("the game has already started")]
    GameAlreadyStarted,

    #[error("operation not allowed in the current room phase")]
    WrongPhase,

    #[error("need at least {needed} players to start, have {have}")]
    NotEnoughPlayers { needed: usize, have: usize },

    #[error("not all players are ready")]
    NotAllReady,

    #[error("invalid submission: {0}")]
    InvalidSubmission(&'static str),

    #[error("invalid judgment: {0}")]
    InvalidJudgment(&'static str),

    #[error("response catalog exhausted: {needed} cards requested but the catalog holds {have}")]
    CatalogExhausted { needed: usize, have: usize },

    #[error("automated judge failed: {0}")]
    ExternalJudgeFailure(String),

    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
}

impl GameError {
    /// Stable wire code for the `error` event.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::RoomNotFound(_) => "room_not_found",
            GameError::PlayerNotFound(_) => "player_not_found",
            GameError::NameAlreadyActive(_) => "name_already_active",
            GameError::GameAlreadyStarted => "game_already_started",
            GameError::WrongPhase => "wrong_phase",
            GameError::NotEnoughPlayers { .. } => "not_enough_players",
            GameError::NotAllReady => "not_all_ready",
            GameError::InvalidSubmission(_) => "invalid_submission",
            GameError::InvalidJudgment(_) => "invalid_judgment",
            GameError::CatalogExhausted { .. } => "catalog_exhausted",
            GameError::ExternalJudgeFailure(_) => "external_judge_failure",
            GameError::PersistenceFailure(_) => "persistence_failure",
        }
    }
}
