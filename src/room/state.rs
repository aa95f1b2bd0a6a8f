//! The room aggregate: configuration, phase machine data, and the
//! serializable snapshot used for persistence and rehydration.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::catalog::Card;

/// Round machine phase. Only advances forward within a game; `GameOver` is
/// terminal until an explicit lobby reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPhase {
    Waiting,
    InProgress,
    RoundResolved,
    GameOver,
}

/// Per-room configuration, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub min_players: usize,
    pub score_limit: u32,
    pub max_rounds: u32,
    pub round_time_limit: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 3,
            score_limit: 8,
            max_rounds: 10,
            round_time_limit: Duration::from_secs(90),
        }
    }
}

/// Full mutable state of one room. Owned exclusively by its
/// [`RoomSession`](crate::room::session::RoomSession) behind a mutex; nothing
/// outside the session/registry boundary touches these fields directly.
#[derive(Debug, Clone)]
pub struct RoomState {
    pub id: String,
    pub phase: RoomPhase,
    pub round: u32,
    pub prompt_card: Option<Card>,
    pub card_czar: Option<String>,
    /// Active players and their scores.
    pub players: HashMap<String, u32>,
    /// Join order of active players; the deterministic tie-break source.
    pub seat_order: Vec<String>,
    /// Players who dropped mid-game, holding their last-known score.
    pub disconnected_players: HashMap<String, u32>,
    /// This round's submissions. Cleared when a new round starts.
    pub submissions: HashMap<String, Card>,
    /// Unsubmitted cards currently held, per player.
    pub player_hands: HashMap<String, Vec<Card>>,
    /// Texts of response cards dealt this epoch; avoided on later deals.
    pub used_cards: HashSet<String>,
    /// Players ready for the next round start.
    pub ready_players: HashSet<String>,
    pub spectators: HashSet<String>,
    pub config: RoomConfig,
    pub game_winner: Option<String>,
    pub updated_at: SystemTime,
}

impl RoomState {
    pub fn new(id: String, config: RoomConfig) -> Self {
        Self {
            id,
            phase: RoomPhase::Waiting,
            round: 1,
            prompt_card: None,
            card_czar: None,
            players: HashMap::new(),
            seat_order: Vec::new(),
            disconnected_players: HashMap::new(),
            submissions: HashMap::new(),
            player_hands: HashMap::new(),
            used_cards: HashSet::new(),
            ready_players: HashSet::new(),
            spectators: HashSet::new(),
            config,
            game_winner: None,
            updated_at: SystemTime::now(),
        }
    }

    /// True if `name` is currently an active player, spectator, or a
    /// disconnected player whose seat is reserved for rejoin.
    pub fn name_taken(&self, name: &str) -> bool {
        self.players.contains_key(name)
            || self.spectators.contains(name)
            || self.disconnected_players.contains_key(name)
    }

    pub fn all_ready(&self) -> bool {
        !self.players.is_empty()
            && self.players.keys().all(|p| self.ready_players.contains(p))
    }

    /// Player with the strictly greatest score; ties break toward the
    /// earliest-joined player (seat order).
    pub fn leading_player(&self) -> Option<String> {
        let best = self.players.values().copied().max()?;
        self.seat_order
            .iter()
            .find(|name| self.players.get(*name) == Some(&best))
            .cloned()
    }

    pub fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }

    pub fn scores(&self) -> BTreeMap<String, u32> {
        self.players.iter().map(|(n, s)| (n.clone(), *s)).collect()
    }

    pub fn disconnected_scores(&self) -> BTreeMap<String, u32> {
        self.disconnected_players
            .iter()
            .map(|(n, s)| (n.clone(), *s))
            .collect()
    }
}

/// The complete persisted form of a room. Set-valued fields serialize as
/// sorted sequences so snapshots are order-independent and diffable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: String,
    pub phase: RoomPhase,
    pub round: u32,
    pub prompt_card: Option<Card>,
    pub card_czar: Option<String>,
    pub players: BTreeMap<String, u32>,
    pub seat_order: Vec<String>,
    pub disconnected_players: BTreeMap<String, u32>,
    pub submissions: BTreeMap<String, Card>,
    pub player_hands: BTreeMap<String, Vec<Card>>,
    pub used_cards: Vec<String>,
    pub ready_players: Vec<String>,
    pub spectators: Vec<String>,
    pub min_players: usize,
    pub score_limit: u32,
    pub max_rounds: u32,
    pub round_time_limit_secs: u64,
    pub game_winner: Option<String>,
    pub updated_at_unix: u64,
}

fn sorted(set: &HashSet<String>) -> Vec<String> {
    let mut v: Vec<String> = set.iter().cloned().collect();
    v.sort();
    v
}

impl From<&RoomState> for RoomSnapshot {
    fn from(state: &RoomState) -> Self {
        RoomSnapshot {
            id: state.id.clone(),
            phase: state.phase,
            round: state.round,
            prompt_card: state.prompt_card.clone(),
            card_czar: state.card_czar.clone(),
            players: state.scores(),
            seat_order: state.seat_order.clone(),
            disconnected_players: state.disconnected_scores(),
            submissions: state
                .submissions
                .iter()
                .map(|(n, c)| (n.clone(), c.clone()))
                .collect(),
            player_hands: state
                .player_hands
                .iter()
                .map(|(n, h)| (n.clone(), h.clone()))
                .collect(),
            used_cards: sorted(&state.used_cards),
            ready_players: sorted(&state.ready_players),
            spectators: sorted(&state.spectators),
            min_players: state.config.min_players,
            score_limit: state.config.score_limit,
            max_rounds: state.config.max_rounds,
            round_time_limit_secs: state.config.round_time_limit.as_secs(),
            game_winner: state.game_winner.clone(),
            updated_at_unix: state
                .updated_at
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

impl RoomSnapshot {
    pub fn into_state(self) -> RoomState {
        RoomState {
            id: self.id,
            phase: self.phase,
            round: self.round,
            prompt_card: self.prompt_card,
            card_czar: self.card_czar,
            players: self.players.into_iter().collect(),
            seat_order: self.seat_order,
            disconnected_players: self.disconnected_players.into_iter().collect(),
            submissions: self.submissions.into_iter().collect(),
            player_hands: self.player_hands.into_iter().collect(),
            used_cards: self.used_cards.into_iter().collect(),
            ready_players: self.ready_players.into_iter().collect(),
            spectators: self.spectators.into_iter().collect(),
            config: RoomConfig {
                min_players: self.min_players,
                score_limit: self.score_limit,
                max_rounds: self.max_rounds,
                round_time_limit: Duration::from_secs(self.round_time_limit_secs),
            },
            game_winner: self.game_winner,
            updated_at: UNIX_EPOCH + Duration::from_secs(self.updated_at_unix),
        }
    }
}
