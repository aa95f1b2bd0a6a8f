//! Wire events: what clients send and what the server broadcasts.
//!
//! The transport (WebSocket here) is glue; these enums define the event
//! semantics. Room creation travels over HTTP and disconnects are
//! transport-triggered, so neither appears as a client event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::catalog::Card;
use crate::room::state::RoomPhase;

/// Identity of one live connection. Assigned at socket accept.
pub type ConnectionId = Ulid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join as an active player. Doubles as rejoin: a name found in the
    /// room's disconnection record is restored with its old score.
    Join { player_name: String },
    JoinAsSpectator { spectator_name: String },
    PlayerReady { player_name: String, is_ready: bool },
    StartRound,
    DrawHand { player_name: String },
    SubmitCard { player_name: String, card: String },
    JudgeRound { winner: String, winning_card: String },
    ChatMessage { player_name: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    ScoreLimit,
    RoundLimit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    PlayersUpdated {
        players: BTreeMap<String, u32>,
        min_players: usize,
        state: RoomPhase,
        disconnected: BTreeMap<String, u32>,
    },
    RoundStarted {
        prompt_card: Card,
        card_czar: String,
        round: u32,
    },
    /// Sent only to the connection that requested the draw.
    HandDealt { cards: Vec<Card> },
    SubmissionsUpdated {
        submissions: BTreeMap<String, Card>,
        card_czar: String,
    },
    /// `winner` is absent when a round timed out and was skipped.
    RoundResolved {
        winner: Option<String>,
        winning_card: Option<Card>,
        score: Option<u32>,
        round: u32,
    },
    GameOver {
        winner: String,
        final_scores: BTreeMap<String, u32>,
        reason: GameOverReason,
    },
    ReadyStateUpdated {
        ready_players: Vec<String>,
        all_ready: bool,
    },
    ChatMessage {
        player_name: String,
        message: String,
    },
    /// Sent only to the originating connection.
    Error { code: String, message: String },
}

/// Who an outbound event is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every connection bound to the room.
    Room,
    /// One specific connection (dealt hands, errors).
    Conn(ConnectionId),
}

/// One outbound event plus its addressing, produced by a room transition.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub to: Recipient,
    pub event: ServerEvent,
}

impl Outbound {
    pub fn room(event: ServerEvent) -> Self {
        Outbound { to: Recipient::Room, event }
    }

    pub fn conn(conn: ConnectionId, event: ServerEvent) -> Self {
        Outbound { to: Recipient::Conn(conn), event }
    }
}
