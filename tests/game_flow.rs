//! End-to-end exercises of the room state machine, registry, and
//! persistence contract, without a live socket: events go straight through
//! `RoomSession::apply` the way the router delivers them.

use std::sync::Arc;

use ulid::Ulid;

use blanks::catalog::{Card, Catalog};
use blanks::error::GameError;
use blanks::events::{ClientEvent, Outbound, Recipient, ServerEvent};
use blanks::room::registry::RoomRegistry;
use blanks::room::session::{Applied, RoomSession, TimerAction};
use blanks::room::state::{RoomConfig, RoomPhase};
use blanks::store::{MemoryStore, SnapshotStore};

// -- helpers ----------------------------------------------------------------

fn catalog() -> Arc<Catalog> {
    let responses: Vec<String> = (0..40).map(|i| format!("response {i}")).collect();
    let refs: Vec<&str> = responses.iter().map(String::as_str).collect();
    Arc::new(Catalog::from_texts(&["prompt a: _", "prompt b: _"], &refs))
}

fn config(score_limit: u32, max_rounds: u32) -> RoomConfig {
    RoomConfig {
        score_limit,
        max_rounds,
        ..RoomConfig::default()
    }
}

fn room(config: RoomConfig, players: &[&str]) -> Arc<RoomSession> {
    let session = Arc::new(RoomSession::new("TEST01".into(), config, catalog()));
    for name in players {
        join(&session, name).unwrap();
    }
    session
}

fn join(session: &RoomSession, name: &str) -> Result<Applied, GameError> {
    session.apply(
        Ulid::new(),
        None,
        ClientEvent::Join { player_name: name.to_string() },
    )
}

fn ready_all(session: &RoomSession) {
    let players: Vec<String> = session.snapshot().players.keys().cloned().collect();
    for name in players {
        session
            .apply(
                Ulid::new(),
                None,
                ClientEvent::PlayerReady { player_name: name, is_ready: true },
            )
            .unwrap();
    }
}

/// Readies everyone, starts the round, and returns (czar, applied).
fn start_round(session: &RoomSession) -> (String, Applied) {
    ready_all(session);
    let applied = session
        .apply(Ulid::new(), None, ClientEvent::StartRound)
        .unwrap();
    (session.snapshot().card_czar.expect("czar set"), applied)
}

fn draw(session: &RoomSession, name: &str) -> Vec<Card> {
    session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::DrawHand { player_name: name.to_string() },
        )
        .unwrap();
    session.snapshot().player_hands[name].clone()
}

/// Draws a hand for `name` and submits its first card.
fn submit_first(session: &RoomSession, name: &str) -> Card {
    let hand = draw(session, name);
    let card = hand[0].clone();
    session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::SubmitCard {
                player_name: name.to_string(),
                card: card.text.clone(),
            },
        )
        .unwrap();
    card
}

fn judge_as_czar(session: &RoomSession, czar: &str, winner: &str) -> Applied {
    let card = session.snapshot().submissions[winner].clone();
    session
        .apply(
            Ulid::new(),
            Some(czar),
            ClientEvent::JudgeRound {
                winner: winner.to_string(),
                winning_card: card.text,
            },
        )
        .unwrap()
}

/// Plays one full round. `preferred` wins when they are not the czar;
/// otherwise the non-czar submitter with the lowest score wins, so nobody
/// else races to the score limit. Returns (winner, applied-of-judgment).
fn play_round(session: &RoomSession, preferred: &str) -> (String, Applied) {
    let (czar, _) = start_round(session);
    let seats = session.snapshot().seat_order.clone();
    for name in seats.iter().filter(|n| **n != czar) {
        submit_first(session, name);
    }
    let winner = if preferred != czar {
        preferred.to_string()
    } else {
        let snap = session.snapshot();
        seats
            .iter()
            .filter(|n| **n != czar)
            .min_by_key(|n| snap.players[*n])
            .unwrap()
            .clone()
    };
    let applied = judge_as_czar(session, &czar, &winner);
    (winner, applied)
}

fn has_game_over(applied: &Applied) -> bool {
    applied
        .outbound
        .iter()
        .any(|o| matches!(o.event, ServerEvent::GameOver { .. }))
}

// -- joining and readiness --------------------------------------------------

#[test]
fn join_rejects_duplicate_active_name() {
    let session = room(config(8, 10), &["alice", "bob"]);
    let err = join(&session, "alice").unwrap_err();
    assert!(matches!(err, GameError::NameAlreadyActive(name) if name == "alice"));
}

#[test]
fn fresh_join_is_rejected_once_the_game_started() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    start_round(&session);
    let err = join(&session, "dave").unwrap_err();
    assert!(matches!(err, GameError::GameAlreadyStarted));
}

#[test]
fn start_round_requires_minimum_players() {
    let session = room(config(8, 10), &["alice", "bob"]);
    ready_all(&session);
    let err = session
        .apply(Ulid::new(), None, ClientEvent::StartRound)
        .unwrap_err();
    assert!(matches!(
        err,
        GameError::NotEnoughPlayers { needed: 3, have: 2 }
    ));
}

#[test]
fn start_round_requires_everyone_ready() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::PlayerReady { player_name: "alice".into(), is_ready: true },
        )
        .unwrap();
    let err = session
        .apply(Ulid::new(), None, ClientEvent::StartRound)
        .unwrap_err();
    assert!(matches!(err, GameError::NotAllReady));
}

#[test]
fn starting_twice_without_judgment_is_rejected() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (_, applied) = start_round(&session);
    assert_eq!(applied.timer, TimerAction::Arm);
    assert_eq!(session.phase(), RoomPhase::InProgress);

    // Readiness was cleared by the start, and the phase guard rejects a
    // second start regardless.
    ready_all(&session);
    let err = session
        .apply(Ulid::new(), None, ClientEvent::StartRound)
        .unwrap_err();
    assert!(matches!(err, GameError::WrongPhase));
}

#[test]
fn ready_set_clears_when_the_round_starts() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    start_round(&session);
    assert!(session.snapshot().ready_players.is_empty());
}

// -- hands and submissions --------------------------------------------------

#[test]
fn drawing_outside_a_round_is_rejected() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::DrawHand { player_name: "alice".into() },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::WrongPhase));
}

#[test]
fn dealt_hand_goes_only_to_the_requesting_connection() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let player = ["alice", "bob", "carol"]
        .into_iter()
        .find(|n| *n != czar)
        .unwrap();

    let origin = Ulid::new();
    let applied = session
        .apply(
            origin,
            None,
            ClientEvent::DrawHand { player_name: player.to_string() },
        )
        .unwrap();
    assert_eq!(applied.outbound.len(), 1);
    assert_eq!(applied.outbound[0].to, Recipient::Conn(origin));
    assert!(matches!(
        &applied.outbound[0].event,
        ServerEvent::HandDealt { cards } if cards.len() == 5
    ));
}

#[test]
fn czar_cannot_draw_or_submit() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);

    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::DrawHand { player_name: czar.clone() },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidSubmission(_)));

    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::SubmitCard { player_name: czar.clone(), card: "anything".into() },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidSubmission(_)));

    // The invariant the whole round hangs on.
    assert!(!session.snapshot().submissions.contains_key(&czar));
}

#[test]
fn rapid_submissions_both_land_and_duplicates_are_rejected() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let submitters: Vec<&str> = ["alice", "bob", "carol"]
        .into_iter()
        .filter(|n| *n != czar)
        .collect();

    // Two players submit back to back: no lost update.
    let first_card = submit_first(&session, submitters[0]);
    submit_first(&session, submitters[1]);
    let snap = session.snapshot();
    assert_eq!(snap.submissions.len(), 2);
    assert_eq!(snap.submissions[submitters[0]], first_card);

    // A repeat submission from an already-submitted player is rejected,
    // even with a card still in hand.
    let leftover = snap.player_hands[submitters[0]][0].text.clone();
    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::SubmitCard {
                player_name: submitters[0].to_string(),
                card: leftover,
            },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidSubmission(_)));
    assert_eq!(session.snapshot().submissions.len(), 2);
}

#[test]
fn submitting_a_card_not_in_hand_is_rejected() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let player = ["alice", "bob", "carol"]
        .into_iter()
        .find(|n| *n != czar)
        .unwrap();
    draw(&session, player);

    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::SubmitCard {
                player_name: player.to_string(),
                card: "not a dealt card".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidSubmission(_)));
    assert!(session.snapshot().submissions.is_empty());
}

// -- judging ----------------------------------------------------------------

#[test]
fn judging_scores_the_winner_and_resolves_the_round() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let submitters: Vec<&str> = ["alice", "bob", "carol"]
        .into_iter()
        .filter(|n| *n != czar)
        .collect();
    for name in &submitters {
        submit_first(&session, name);
    }

    let applied = judge_as_czar(&session, &czar, submitters[0]);
    assert_eq!(applied.timer, TimerAction::Cancel);
    assert!(applied.outbound.iter().any(|o| matches!(
        &o.event,
        ServerEvent::RoundResolved { winner: Some(w), score: Some(1), round: 2, .. }
            if w == submitters[0]
    )));

    let snap = session.snapshot();
    assert_eq!(snap.phase, RoomPhase::RoundResolved);
    assert_eq!(snap.round, 2);
    assert_eq!(snap.players[submitters[0]], 1);
    assert!(snap.submissions.is_empty());
}

#[test]
fn only_the_card_czar_may_judge() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let submitter = ["alice", "bob", "carol"]
        .into_iter()
        .find(|n| *n != czar)
        .unwrap();
    let card = submit_first(&session, submitter);

    // Another player tries to judge.
    let err = session
        .apply(
            Ulid::new(),
            Some(submitter),
            ClientEvent::JudgeRound {
                winner: submitter.to_string(),
                winning_card: card.text.clone(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidJudgment(_)));

    // An unbound connection cannot judge either.
    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::JudgeRound {
                winner: submitter.to_string(),
                winning_card: card.text,
            },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidJudgment(_)));
}

#[test]
fn judgment_must_name_a_submitter_with_their_card() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let submitters: Vec<&str> = ["alice", "bob", "carol"]
        .into_iter()
        .filter(|n| *n != czar)
        .collect();
    let card = submit_first(&session, submitters[0]);

    // Winner who never submitted.
    let err = session
        .apply(
            Ulid::new(),
            Some(czar.as_str()),
            ClientEvent::JudgeRound {
                winner: submitters[1].to_string(),
                winning_card: card.text.clone(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidJudgment(_)));

    // Right winner, wrong card.
    let err = session
        .apply(
            Ulid::new(),
            Some(czar.as_str()),
            ClientEvent::JudgeRound {
                winner: submitters[0].to_string(),
                winning_card: "some other card".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidJudgment(_)));

    // No partial effect from either rejection.
    let snap = session.snapshot();
    assert_eq!(snap.round, 1);
    assert!(snap.players.values().all(|score| *score == 0));
}

#[test]
fn czar_may_judge_before_everyone_submitted() {
    // Documented policy: one submission is enough to judge.
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let submitter = ["alice", "bob", "carol"]
        .into_iter()
        .find(|n| *n != czar)
        .unwrap();
    submit_first(&session, submitter);

    judge_as_czar(&session, &czar, submitter);
    assert_eq!(session.phase(), RoomPhase::RoundResolved);
}

// -- game end ---------------------------------------------------------------

#[test]
fn reaching_the_score_limit_ends_the_game_on_that_transition() {
    let session = room(config(8, 1000), &["alice", "bob", "carol"]);
    for _ in 0..200 {
        let (winner, applied) = play_round(&session, "alice");
        let snap = session.snapshot();
        if snap.players["alice"] == 8 {
            assert_eq!(winner, "alice");
            assert_eq!(snap.phase, RoomPhase::GameOver);
            assert_eq!(snap.game_winner.as_deref(), Some("alice"));
            assert!(
                has_game_over(&applied),
                "game_over must ride the granting transition"
            );
            return;
        }
        assert_eq!(
            snap.phase,
            RoomPhase::RoundResolved,
            "no early game over below the limit"
        );
    }
    panic!("alice never reached the score limit");
}

#[test]
fn exceeding_max_rounds_ends_the_game_with_the_documented_tie_break() {
    let session = room(config(1000, 10), &["alice", "bob", "carol"]);
    for played in 1..=10 {
        let (_, applied) = play_round(&session, "bob");
        let snap = session.snapshot();
        assert_eq!(snap.round, played + 1, "round increments once per judgment");
        if played < 10 {
            assert_eq!(snap.phase, RoomPhase::RoundResolved);
            assert!(!has_game_over(&applied));
        } else {
            // The judgment that moved round from 10 to 11 ends the game.
            assert_eq!(snap.phase, RoomPhase::GameOver);
            assert!(has_game_over(&applied));

            // Highest score wins; ties break toward the earliest-joined.
            let best = snap.players.values().copied().max().unwrap();
            let expected = snap
                .seat_order
                .iter()
                .find(|n| snap.players[*n] == best)
                .unwrap();
            assert_eq!(snap.game_winner.as_ref(), Some(expected));
        }
    }

    // The machine is terminal: nothing restarts without an explicit reset.
    ready_all(&session);
    let err = session
        .apply(Ulid::new(), None, ClientEvent::StartRound)
        .unwrap_err();
    assert!(matches!(err, GameError::WrongPhase));
}

#[test]
fn scores_and_rounds_never_decrease() {
    let session = room(config(1000, 1000), &["alice", "bob", "carol"]);
    let mut last_round = 1;
    let mut last_scores = session.snapshot().players;
    for _ in 0..8 {
        play_round(&session, "alice");
        let snap = session.snapshot();
        assert!(snap.round > last_round);
        for (name, score) in &snap.players {
            assert!(score >= &last_scores[name]);
        }
        last_round = snap.round;
        last_scores = snap.players;
    }
}

// -- disconnect and reconnect ------------------------------------------------

#[test]
fn reconnecting_restores_the_old_score() {
    let session = room(config(1000, 1000), &["alice", "bob", "carol"]);
    for _ in 0..30 {
        play_round(&session, "alice");
        if session.snapshot().players["alice"] == 3 {
            break;
        }
    }
    assert_eq!(session.snapshot().players["alice"], 3);

    let applied = session.disconnect("alice");
    assert!(applied.dirty);
    let snap = session.snapshot();
    assert!(!snap.players.contains_key("alice"));
    assert_eq!(snap.disconnected_players["alice"], 3);

    join(&session, "alice").unwrap();
    let snap = session.snapshot();
    assert_eq!(snap.players["alice"], 3, "score restored, not reset");
    assert!(snap.disconnected_players.is_empty());
}

#[test]
fn players_and_disconnected_stay_disjoint() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let player = ["alice", "bob", "carol"]
        .into_iter()
        .find(|n| *n != czar)
        .unwrap();
    submit_first(&session, player);
    session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::PlayerReady { player_name: player.to_string(), is_ready: true },
        )
        .unwrap();

    session.disconnect(player);
    let snap = session.snapshot();
    assert!(!snap.players.contains_key(player));
    assert!(snap.disconnected_players.contains_key(player));
    assert!(snap
        .players
        .keys()
        .all(|n| !snap.disconnected_players.contains_key(n)));
    assert!(!snap.submissions.contains_key(player));
    assert!(!snap.ready_players.contains(&player.to_string()));
    assert!(!snap.seat_order.contains(&player.to_string()));
}

#[test]
fn czar_disconnect_repicks_without_breaking_the_submission_invariant() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let others: Vec<&str> = ["alice", "bob", "carol"]
        .into_iter()
        .filter(|n| *n != czar)
        .collect();
    for name in &others {
        submit_first(&session, name);
    }

    session.disconnect(&czar);
    let snap = session.snapshot();
    let new_czar = snap.card_czar.clone().expect("a replacement czar");
    assert!(others.contains(&new_czar.as_str()));
    // Every remaining player had submitted, so the new czar got their
    // submission back into their hand.
    assert!(!snap.submissions.contains_key(&new_czar));
    assert_eq!(snap.submissions.len(), 1);
    assert_eq!(snap.player_hands[&new_czar].len(), 5);
    assert_eq!(snap.phase, RoomPhase::InProgress);
}

// -- timeouts ---------------------------------------------------------------

#[test]
fn round_timeout_skips_the_round_without_a_winner() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (czar, _) = start_round(&session);
    let player = ["alice", "bob", "carol"]
        .into_iter()
        .find(|n| *n != czar)
        .unwrap();
    submit_first(&session, player);

    let applied = session.timeout_round();
    assert!(applied.outbound.iter().any(|o| matches!(
        &o.event,
        ServerEvent::RoundResolved { winner: None, round: 2, .. }
    )));
    let snap = session.snapshot();
    assert_eq!(snap.phase, RoomPhase::RoundResolved);
    assert_eq!(snap.round, 2);
    assert!(snap.submissions.is_empty());
    assert!(snap.players.values().all(|score| *score == 0));

    // A late-firing timer after the round settled is a no-op.
    let applied = session.timeout_round();
    assert!(applied.outbound.is_empty());
    assert_eq!(session.snapshot().round, 2);
}

// -- spectators and chat ----------------------------------------------------

#[test]
fn spectators_join_any_phase_but_names_stay_unique() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    start_round(&session);

    session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::JoinAsSpectator { spectator_name: "watcher".into() },
        )
        .unwrap();
    assert!(session.snapshot().spectators.contains(&"watcher".to_string()));

    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::JoinAsSpectator { spectator_name: "alice".into() },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::NameAlreadyActive(_)));

    session.disconnect("watcher");
    assert!(session.snapshot().spectators.is_empty());
}

#[test]
fn chat_passes_through_with_no_state_effect() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let before = serde_json::to_value(session.snapshot()).unwrap();

    let applied = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::ChatMessage { player_name: "alice".into(), message: "hi".into() },
        )
        .unwrap();
    assert!(!applied.dirty);
    assert!(applied.outbound.iter().any(|o| matches!(
        &o.event,
        ServerEvent::ChatMessage { player_name, message }
            if player_name == "alice" && message == "hi"
    )));

    let after = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(before, after);

    let err = session
        .apply(
            Ulid::new(),
            None,
            ClientEvent::ChatMessage { player_name: "stranger".into(), message: "hi".into() },
        )
        .unwrap_err();
    assert!(matches!(err, GameError::PlayerNotFound(_)));
}

// -- fan-out ----------------------------------------------------------------

#[test]
fn dispatch_fans_room_events_to_all_and_conn_events_to_one() {
    let session = room(config(8, 10), &["alice", "bob", "carol"]);
    let (a, mut rx_a) = tokio::sync::mpsc::unbounded_channel();
    let (b, mut rx_b) = tokio::sync::mpsc::unbounded_channel();
    let conn_a = Ulid::new();
    let conn_b = Ulid::new();
    session.attach_conn(conn_a, a);
    session.attach_conn(conn_b, b);

    session.dispatch(&[Outbound::room(ServerEvent::ChatMessage {
        player_name: "alice".into(),
        message: "to everyone".into(),
    })]);
    assert!(rx_a.try_recv().is_ok());
    assert!(rx_b.try_recv().is_ok());

    session.dispatch(&[Outbound::conn(
        conn_a,
        ServerEvent::HandDealt { cards: vec![] },
    )]);
    assert!(rx_a.try_recv().is_ok());
    assert!(rx_b.try_recv().is_err(), "hand went only to its requester");

    session.detach_conn(conn_a);
    session.dispatch(&[Outbound::room(ServerEvent::ChatMessage {
        player_name: "alice".into(),
        message: "after detach".into(),
    })]);
    assert!(rx_a.try_recv().is_err());
    assert!(rx_b.try_recv().is_ok());
}

// -- lobby reset ------------------------------------------------------------

#[test]
fn reset_returns_a_finished_room_to_a_joinable_lobby() {
    let session = room(config(1, 10), &["alice", "bob", "carol"]);
    play_round(&session, "alice");
    assert_eq!(session.phase(), RoomPhase::GameOver);

    session.reset_to_lobby();
    let snap = session.snapshot();
    assert_eq!(snap.phase, RoomPhase::Waiting);
    assert_eq!(snap.round, 1);
    assert!(snap.game_winner.is_none());
    assert!(snap.players.values().all(|score| *score == 0));

    join(&session, "dave").unwrap();
    assert!(session.snapshot().players.contains_key("dave"));
}

// -- registry and persistence -----------------------------------------------

#[test]
fn a_game_survives_eviction_through_the_store() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let room_id = {
        let registry = RoomRegistry::new(catalog(), store.clone());
        let session = registry.create_room(config(1000, 1000)).unwrap();
        for name in ["alice", "bob", "carol"] {
            join(&session, name).unwrap();
        }
        for _ in 0..30 {
            play_round(&session, "alice");
            if session.snapshot().players["alice"] == 2 {
                break;
            }
        }
        // The router normally schedules this after each transition.
        store.save(&session.snapshot()).unwrap();
        session.id().to_string()
    };

    // A fresh registry (fresh process) rehydrates the room on lookup.
    let registry = RoomRegistry::new(catalog(), store);
    let session = registry.get_room(&room_id).unwrap();
    let snap = session.snapshot();
    assert_eq!(snap.players["alice"], 2);
    assert_eq!(snap.phase, RoomPhase::RoundResolved);

    // And the game continues where it left off.
    let before = session.snapshot().players;
    let (winner, _) = play_round(&session, "bob");
    let after = session.snapshot().players;
    assert_eq!(after[&winner], before[&winner] + 1);
}
