//! Room session: owns one room's state machine and serializes every
//! transition behind a per-room mutex.
//!
//! Critical sections are short and never suspend. Handlers validate all
//! guards before mutating, so a failed guard leaves no partial effect.
//! Broadcasts are composed from the state inside the critical section and
//! dispatched after it, so they always reflect a fully applied transition.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::catalog::{Card, Catalog};
use crate::error::GameError;
use crate::events::{
    ClientEvent, ConnectionId, GameOverReason, Outbound, Recipient, ServerEvent,
};
use crate::room::deck::{self, HAND_SIZE};
use crate::room::state::{RoomConfig, RoomPhase, RoomSnapshot, RoomState};

/// Who is resolving a judgment.
#[derive(Debug, Clone)]
pub enum JudgeActor {
    /// A human player; must be the current card czar.
    Czar(String),
    /// The round-timeout / automated-judge path.
    System,
}

/// What the scheduling layer should do with the round deadline after a
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    None,
    /// A round started; arm a fresh cancellable deadline.
    Arm,
    /// The round settled; cancel any armed deadline.
    Cancel,
}

/// Result of a successfully applied transition.
#[derive(Debug, Default)]
pub struct Applied {
    pub outbound: Vec<Outbound>,
    pub timer: TimerAction,
    /// True when the transition changed persistent state and a snapshot
    /// save should be scheduled.
    pub dirty: bool,
}

impl Default for TimerAction {
    fn default() -> Self {
        TimerAction::None
    }
}

/// One room's serialization point. All event handling goes through
/// [`RoomSession::apply`] or the internal-event methods below; nothing else
/// mutates the state.
#[derive(Debug)]
pub struct RoomSession {
    id: String,
    catalog: Arc<Catalog>,
    state: Mutex<RoomState>,
    conns: Mutex<HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>>,
    round_deadline: Mutex<Option<CancellationToken>>,
}

impl RoomSession {
    pub fn new(id: String, config: RoomConfig, catalog: Arc<Catalog>) -> Self {
        let state = RoomState::new(id.clone(), config);
        Self {
            id,
            catalog,
            state: Mutex::new(state),
            conns: Mutex::new(HashMap::new()),
            round_deadline: Mutex::new(None),
        }
    }

    pub fn from_snapshot(snapshot: RoomSnapshot, catalog: Arc<Catalog>) -> Self {
        let state = snapshot.into_state();
        Self {
            id: state.id.clone(),
            catalog,
            state: Mutex::new(state),
            conns: Mutex::new(HashMap::new()),
            round_deadline: Mutex::new(None),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot::from(&*self.state.lock())
    }

    pub fn phase(&self) -> RoomPhase {
        self.state.lock().phase
    }

    pub fn updated_at(&self) -> SystemTime {
        self.state.lock().updated_at
    }

    /// Prompt and submissions of the round in flight, for the automated
    /// judge. `None` unless a round is in progress.
    pub fn round_context(&self) -> Option<(Card, std::collections::BTreeMap<String, Card>)> {
        let s = self.state.lock();
        if s.phase != RoomPhase::InProgress {
            return None;
        }
        let prompt = s.prompt_card.clone()?;
        let submissions = s
            .submissions
            .iter()
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect();
        Some((prompt, submissions))
    }

    // -- connection fan-out ------------------------------------------------

    pub fn attach_conn(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<ServerEvent>) {
        self.conns.lock().insert(conn, tx);
    }

    pub fn detach_conn(&self, conn: ConnectionId) {
        self.conns.lock().remove(&conn);
    }

    /// Fans outbound events to their recipients. Dead receivers are dropped
    /// silently; the disconnect path cleans them up.
    pub fn dispatch(&self, outbound: &[Outbound]) {
        let conns = self.conns.lock();
        for out in outbound {
            match out.to {
                Recipient::Room => {
                    for tx in conns.values() {
                        let _ = tx.send(out.event.clone());
                    }
                }
                Recipient::Conn(id) => {
                    if let Some(tx) = conns.get(&id) {
                        let _ = tx.send(out.event.clone());
                    }
                }
            }
        }
    }

    pub fn send_error(&self, conn: ConnectionId, err: &GameError) {
        self.dispatch(&[Outbound::conn(
            conn,
            ServerEvent::Error {
                code: err.code().to_string(),
                message: err.to_string(),
            },
        )]);
    }

    // -- round deadline ----------------------------------------------------

    /// Replaces any armed deadline with a fresh token and returns it along
    /// with the configured round time limit.
    pub fn arm_deadline(&self) -> (CancellationToken, Duration) {
        let token = CancellationToken::new();
        let mut slot = self.round_deadline.lock();
        if let Some(old) = slot.replace(token.clone()) {
            old.cancel();
        }
        (token, self.state.lock().config.round_time_limit)
    }

    pub fn cancel_deadline(&self) {
        if let Some(token) = self.round_deadline.lock().take() {
            token.cancel();
        }
    }

    // -- inbound events ----------------------------------------------------

    /// Applies one inbound event. `actor` is the player name the origin
    /// connection is bound to, if any; it authorizes judging.
    pub fn apply(
        &self,
        origin: ConnectionId,
        actor: Option<&str>,
        event: ClientEvent,
    ) -> Result<Applied, GameError> {
        match event {
            ClientEvent::Join { player_name } => self.join(player_name),
            ClientEvent::JoinAsSpectator { spectator_name } => self.join_spectator(spectator_name),
            ClientEvent::PlayerReady { player_name, is_ready } => {
                self.set_ready(player_name, is_ready)
            }
            ClientEvent::StartRound => self.start_round(),
            ClientEvent::DrawHand { player_name } => self.draw_hand(origin, player_name),
            ClientEvent::SubmitCard { player_name, card } => self.submit_card(player_name, card),
            ClientEvent::JudgeRound { winner, winning_card } => {
                let actor = actor
                    .map(|name| JudgeActor::Czar(name.to_string()))
                    .ok_or(GameError::InvalidJudgment("only the card czar may judge"))?;
                self.judge(actor, winner, winning_card)
            }
            ClientEvent::ChatMessage { player_name, message } => self.chat(player_name, message),
        }
    }

    fn join(&self, name: String) -> Result<Applied, GameError> {
        let mut s = self.state.lock();
        if s.phase != RoomPhase::GameOver && s.disconnected_players.contains_key(&name) {
            let score = s
                .disconnected_players
                .remove(&name)
                .expect("checked above");
            s.players.insert(name.clone(), score);
            s.seat_order.push(name.clone());
            tracing::info!(room_id = %self.id, player = %name, score, "player rejoined");
        } else {
            if s.phase != RoomPhase::Waiting {
                return Err(GameError::GameAlreadyStarted);
            }
            if s.name_taken(&name) {
                return Err(GameError::NameAlreadyActive(name));
            }
            s.players.insert(name.clone(), 0);
            s.seat_order.push(name.clone());
            tracing::info!(room_id = %self.id, player = %name, "player joined");
        }
        s.touch();
        Ok(Applied {
            outbound: vec![Outbound::room(players_updated(&s))],
            timer: TimerAction::None,
            dirty: true,
        })
    }

    fn join_spectator(&self, name: String) -> Result<Applied, GameError> {
        let mut s = self.state.lock();
        if s.name_taken(&name) {
            return Err(GameError::NameAlreadyActive(name));
        }
        s.spectators.insert(name.clone());
        s.touch();
        tracing::info!(room_id = %self.id, spectator = %name, "spectator joined");
        Ok(Applied {
            outbound: vec![Outbound::room(players_updated(&s))],
            timer: TimerAction::None,
            dirty: true,
        })
    }

    fn set_ready(&self, name: String, is_ready: bool) -> Result<Applied, GameError> {
        let mut s = self.state.lock();
        if !s.players.contains_key(&name) {
            return Err(GameError::PlayerNotFound(name));
        }
        if is_ready {
            s.ready_players.insert(name);
        } else {
            s.ready_players.remove(&name);
        }
        s.touch();
        Ok(Applied {
            outbound: vec![Outbound::room(ready_updated(&s))],
            timer: TimerAction::None,
            dirty: true,
        })
    }

    fn start_round(&self) -> Result<Applied, GameError> {
        let mut s = self.state.lock();
        if !matches!(s.phase, RoomPhase::Waiting | RoomPhase::RoundResolved) {
            return Err(GameError::WrongPhase);
        }
        if s.players.len() < s.config.min_players {
            return Err(GameError::NotEnoughPlayers {
                needed: s.config.min_players,
                have: s.players.len(),
            });
        }
        if !s.all_ready() {
            return Err(GameError::NotAllReady);
        }

        let mut rng = rand::thread_rng();
        s.prompt_card = Some(self.catalog.random_prompt(&mut rng));
        s.submissions.clear();
        s.player_hands.clear();

        // Rotate the czar: uniformly random, never the previous czar while
        // an alternative exists.
        let candidates: Vec<String> = s
            .seat_order
            .iter()
            .filter(|n| Some(n.as_str()) != s.card_czar.as_deref())
            .cloned()
            .collect();
        if let Some(next) = candidates.choose(&mut rng) {
            s.card_czar = Some(next.clone());
        }

        s.ready_players.clear();
        s.phase = RoomPhase::InProgress;
        s.touch();

        let czar = s.card_czar.clone().expect("players checked non-empty");
        let prompt = s.prompt_card.clone().expect("just picked");
        tracing::info!(room_id = %self.id, round = s.round, czar = %czar, "round started");
        Ok(Applied {
            outbound: vec![Outbound::room(ServerEvent::RoundStarted {
                prompt_card: prompt,
                card_czar: czar,
                round: s.round,
            })],
            timer: TimerAction::Arm,
            dirty: true,
        })
    }

    fn draw_hand(&self, origin: ConnectionId, name: String) -> Result<Applied, GameError> {
        let mut s = self.state.lock();
        if s.phase != RoomPhase::InProgress {
            return Err(GameError::WrongPhase);
        }
        if !s.players.contains_key(&name) {
            return Err(GameError::PlayerNotFound(name));
        }
        if s.card_czar.as_deref() == Some(name.as_str()) {
            return Err(GameError::InvalidSubmission(
                "the card czar does not play this round",
            ));
        }
        let hand = deck::deal_hand(&mut s, &self.catalog, &name, HAND_SIZE, &mut rand::thread_rng())?;
        s.touch();
        Ok(Applied {
            outbound: vec![Outbound::conn(origin, ServerEvent::HandDealt { cards: hand })],
            timer: TimerAction::None,
            dirty: true,
        })
    }

    fn submit_card(&self, name: String, card_text: String) -> Result<Applied, GameError> {
        let mut s = self.state.lock();
        if s.phase != RoomPhase::InProgress {
            return Err(GameError::WrongPhase);
        }
        if !s.players.contains_key(&name) {
            return Err(GameError::PlayerNotFound(name));
        }
        if s.card_czar.as_deref() == Some(name.as_str()) {
            return Err(GameError::InvalidSubmission("the card czar cannot submit"));
        }
        if s.submissions.contains_key(&name) {
            return Err(GameError::InvalidSubmission("already submitted this round"));
        }
        let hand = s.player_hands.get_mut(&name).ok_or(GameError::InvalidSubmission(
            "no hand has been dealt",
        ))?;
        let idx = hand
            .iter()
            .position(|c| c.text == card_text)
            .ok_or(GameError::InvalidSubmission("card is not in your hand"))?;
        let card = hand.remove(idx);
        s.submissions.insert(name.clone(), card);
        s.touch();
        Ok(Applied {
            outbound: vec![Outbound::room(submissions_updated(&s))],
            timer: TimerAction::None,
            dirty: true,
        })
    }

    /// Resolves the round in favor of `winner`. The czar may judge as soon
    /// as at least one submission exists; the game-over check runs on this
    /// same transition.
    pub fn judge(
        &self,
        actor: JudgeActor,
        winner: String,
        winning_card: String,
    ) -> Result<Applied, GameError> {
        let mut s = self.state.lock();
        if s.phase != RoomPhase::InProgress {
            return Err(GameError::WrongPhase);
        }
        if let JudgeActor::Czar(name) = &actor {
            if s.card_czar.as_deref() != Some(name.as_str()) {
                return Err(GameError::InvalidJudgment("only the card czar may judge"));
            }
        }
        let card = s
            .submissions
            .get(&winner)
            .ok_or(GameError::InvalidJudgment(
                "winner is not among this round's submitters",
            ))?;
        if card.text != winning_card {
            return Err(GameError::InvalidJudgment(
                "card does not match the winning submission",
            ));
        }
        let card = card.clone();

        let score = {
            let entry = s
                .players
                .get_mut(&winner)
                .ok_or_else(|| GameError::PlayerNotFound(winner.clone()))?;
            *entry += 1;
            *entry
        };
        s.round += 1;
        s.submissions.clear();
        s.touch();

        let mut outbound = vec![Outbound::room(ServerEvent::RoundResolved {
            winner: Some(winner.clone()),
            winning_card: Some(card),
            score: Some(score),
            round: s.round,
        })];

        if score >= s.config.score_limit {
            s.phase = RoomPhase::GameOver;
            s.game_winner = Some(winner.clone());
            outbound.push(Outbound::room(game_over(&s, winner.clone(), GameOverReason::ScoreLimit)));
            tracing::info!(room_id = %self.id, winner = %winner, score, "game over (score limit)");
        } else if s.round > s.config.max_rounds {
            s.phase = RoomPhase::GameOver;
            let champion = s.leading_player().unwrap_or_else(|| winner.clone());
            s.game_winner = Some(champion.clone());
            outbound.push(Outbound::room(game_over(&s, champion.clone(), GameOverReason::RoundLimit)));
            tracing::info!(room_id = %self.id, winner = %champion, "game over (round limit)");
        } else {
            s.phase = RoomPhase::RoundResolved;
        }

        Ok(Applied {
            outbound,
            timer: TimerAction::Cancel,
            dirty: true,
        })
    }

    fn chat(&self, name: String, message: String) -> Result<Applied, GameError> {
        let s = self.state.lock();
        if !s.players.contains_key(&name) && !s.spectators.contains(&name) {
            return Err(GameError::PlayerNotFound(name));
        }
        // Pass-through: no state effect, nothing to persist.
        Ok(Applied {
            outbound: vec![Outbound::room(ServerEvent::ChatMessage {
                player_name: name,
                message,
            })],
            timer: TimerAction::None,
            dirty: false,
        })
    }

    // -- internal events ---------------------------------------------------

    /// Transport-triggered: moves a player (or spectator) out of the active
    /// set. Unknown names are a no-op, not an error; the binding table
    /// already resolved this connection to the room.
    pub fn disconnect(&self, name: &str) -> Applied {
        let mut s = self.state.lock();

        if s.spectators.remove(name) {
            s.touch();
            return Applied {
                outbound: vec![Outbound::room(players_updated(&s))],
                timer: TimerAction::None,
                dirty: true,
            };
        }

        let Some(score) = s.players.remove(name) else {
            return Applied::default();
        };
        s.seat_order.retain(|n| n != name);
        s.disconnected_players.insert(name.to_string(), score);
        let ready_changed = s.ready_players.remove(name);
        s.submissions.remove(name);
        // Held cards stay in the used pool; they were dealt this epoch.
        s.player_hands.remove(name);

        let mut czar_changed = false;
        if s.card_czar.as_deref() == Some(name) {
            s.card_czar = None;
            if s.phase == RoomPhase::InProgress && !s.players.is_empty() {
                czar_changed = self.repick_czar(&mut s);
            }
        }

        s.touch();
        tracing::info!(room_id = %self.id, player = %name, score, "player disconnected");

        let mut outbound = vec![Outbound::room(players_updated(&s))];
        if ready_changed {
            outbound.push(Outbound::room(ready_updated(&s)));
        }
        if czar_changed {
            outbound.push(Outbound::room(submissions_updated(&s)));
        }
        Applied {
            outbound,
            timer: TimerAction::None,
            dirty: true,
        }
    }

    /// Picks a replacement czar mid-round, preferring players who have not
    /// submitted. If every remaining player has submitted, the new czar's
    /// submission goes back to their hand so the czar never appears among
    /// the submissions.
    fn repick_czar(&self, s: &mut RoomState) -> bool {
        let mut rng = rand::thread_rng();
        let non_submitted: Vec<String> = s
            .seat_order
            .iter()
            .filter(|n| !s.submissions.contains_key(*n))
            .cloned()
            .collect();
        let pool = if non_submitted.is_empty() {
            &s.seat_order
        } else {
            &non_submitted
        };
        let Some(next) = pool.choose(&mut rng).cloned() else {
            return false;
        };
        if let Some(card) = s.submissions.remove(&next) {
            s.player_hands.entry(next.clone()).or_default().push(card);
        }
        tracing::info!(room_id = %self.id, czar = %next, "czar reassigned after disconnect");
        s.card_czar = Some(next);
        true
    }

    /// Deadline expiry with no judgment: the round is skipped. `round`
    /// still advances so the machine cannot wedge; nobody scores.
    pub fn timeout_round(&self) -> Applied {
        let mut s = self.state.lock();
        if s.phase != RoomPhase::InProgress {
            return Applied::default();
        }
        s.round += 1;
        s.submissions.clear();
        s.touch();

        let mut outbound = vec![Outbound::room(ServerEvent::RoundResolved {
            winner: None,
            winning_card: None,
            score: None,
            round: s.round,
        })];
        if s.round > s.config.max_rounds {
            s.phase = RoomPhase::GameOver;
            if let Some(champion) = s.leading_player() {
                s.game_winner = Some(champion.clone());
                outbound.push(Outbound::room(game_over(&s, champion, GameOverReason::RoundLimit)));
            }
        } else {
            s.phase = RoomPhase::RoundResolved;
        }
        tracing::info!(room_id = %self.id, round = s.round, "round timed out, skipped");
        Applied {
            outbound,
            timer: TimerAction::Cancel,
            dirty: true,
        }
    }

    /// Explicit reset hook: returns a finished room to a joinable lobby.
    /// Not wired to a client event.
    pub fn reset_to_lobby(&self) -> Applied {
        let mut s = self.state.lock();
        s.phase = RoomPhase::Waiting;
        s.round = 1;
        s.prompt_card = None;
        s.card_czar = None;
        s.submissions.clear();
        s.player_hands.clear();
        s.used_cards.clear();
        s.ready_players.clear();
        s.game_winner = None;
        for score in s.players.values_mut() {
            *score = 0;
        }
        s.touch();
        tracing::info!(room_id = %self.id, "room reset to lobby");
        Applied {
            outbound: vec![Outbound::room(players_updated(&s))],
            timer: TimerAction::Cancel,
            dirty: true,
        }
    }
}

fn players_updated(s: &RoomState) -> ServerEvent {
    ServerEvent::PlayersUpdated {
        players: s.scores(),
        min_players: s.config.min_players,
        state: s.phase,
        disconnected: s.disconnected_scores(),
    }
}

fn ready_updated(s: &RoomState) -> ServerEvent {
    let mut ready: Vec<String> = s.ready_players.iter().cloned().collect();
    ready.sort();
    ServerEvent::ReadyStateUpdated {
        all_ready: s.all_ready(),
        ready_players: ready,
    }
}

fn submissions_updated(s: &RoomState) -> ServerEvent {
    ServerEvent::SubmissionsUpdated {
        submissions: s
            .submissions
            .iter()
            .map(|(n, c)| (n.clone(), c.clone()))
            .collect(),
        card_czar: s.card_czar.clone().unwrap_or_default(),
    }
}

fn game_over(s: &RoomState, winner: String, reason: GameOverReason) -> ServerEvent {
    ServerEvent::GameOver {
        winner,
        final_scores: s.scores(),
        reason,
    }
}
