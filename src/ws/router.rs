//! Event router: applies inbound events to the addressed room session and
//! handles everything a transition asks for afterwards — fan-out, round
//! deadlines, and the best-effort snapshot save.

use std::sync::Arc;
use std::time::Duration;

use crate::error::GameError;
use crate::events::{ClientEvent, ConnectionId, Outbound, ServerEvent};
use crate::http::routes::AppState;
use crate::judge::judge_with_timeout;
use crate::room::session::{Applied, JudgeActor, RoomSession, TimerAction};
use crate::store::SnapshotStore;

/// Hard deadline for one automated-judge call.
const JUDGE_CALL_LIMIT: Duration = Duration::from_secs(10);

/// Routes one inbound event. Guard failures produce an `error` event for
/// the originating connection only; other members see nothing.
pub fn route_event(
    state: &AppState,
    session: &Arc<RoomSession>,
    conn_id: ConnectionId,
    event: ClientEvent,
) {
    let bind_name = match &event {
        ClientEvent::Join { player_name } => Some(player_name.clone()),
        ClientEvent::JoinAsSpectator { spectator_name } => Some(spectator_name.clone()),
        _ => None,
    };
    let actor = state.bindings.get(conn_id).map(|b| b.player_name);

    match session.apply(conn_id, actor.as_deref(), event) {
        Ok(applied) => {
            if let Some(name) = bind_name {
                state.bindings.bind(conn_id, session.id(), &name);
            }
            finish(state, session, applied);
        }
        Err(err) => {
            tracing::debug!(room_id = %session.id(), code = err.code(), "event rejected: {err}");
            session.send_error(conn_id, &err);
        }
    }
}

/// Completes an applied transition: dispatches its broadcasts, adjusts the
/// round deadline, and schedules the snapshot save.
pub fn finish(state: &AppState, session: &Arc<RoomSession>, applied: Applied) {
    session.dispatch(&applied.outbound);
    match applied.timer {
        TimerAction::Arm => arm_round_deadline(state.clone(), session.clone()),
        TimerAction::Cancel => session.cancel_deadline(),
        TimerAction::None => {}
    }
    if applied.dirty {
        schedule_save(state.registry.store(), session);
    }
}

/// Arms the per-round deadline. Normal judging cancels the token; expiry
/// resolves the round off the room's serialization point.
fn arm_round_deadline(state: AppState, session: Arc<RoomSession>) {
    let (token, limit) = session.arm_deadline();
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(limit) => resolve_deadline(state, session).await,
        }
    });
}

/// Deadline expiry: auto-judge whatever was submitted when a judge is
/// configured, otherwise skip the round. An external-judge failure is a
/// room-wide error and leaves the round in progress for a human czar.
async fn resolve_deadline(state: AppState, session: Arc<RoomSession>) {
    tracing::info!(room_id = %session.id(), "round deadline elapsed");
    if let Some(judge) = state.auto_judge.clone() {
        if let Some((prompt, submissions)) = session.round_context() {
            if !submissions.is_empty() {
                match judge_with_timeout(judge, prompt, submissions, JUDGE_CALL_LIMIT).await {
                    Ok((winner, card)) => {
                        match session.judge(JudgeActor::System, winner, card.text) {
                            Ok(applied) => return finish(&state, &session, applied),
                            Err(err) => {
                                // a racing human judgment got there first
                                tracing::debug!(room_id = %session.id(), "auto judgment rejected: {err}");
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        tracing::warn!(room_id = %session.id(), "automated judge failed: {err}");
                        broadcast_error(&session, &err);
                        return;
                    }
                }
            }
        }
    }
    let applied = session.timeout_round();
    finish(&state, &session, applied);
}

fn broadcast_error(session: &RoomSession, err: &GameError) {
    session.dispatch(&[Outbound::room(ServerEvent::Error {
        code: err.code().to_string(),
        message: err.to_string(),
    })]);
}

/// Best-effort snapshot save, off the serialization point, retried with
/// backoff. Failure is logged and never rolls back the transition.
pub fn schedule_save(store: Arc<dyn SnapshotStore>, session: &Arc<RoomSession>) {
    let snapshot = session.snapshot();
    tokio::task::spawn_blocking(move || {
        let mut delay = Duration::from_millis(100);
        for attempt in 1..=3 {
            match store.save(&snapshot) {
                Ok(()) => return,
                Err(err) if attempt < 3 => {
                    tracing::warn!(
                        room_id = %snapshot.id,
                        attempt,
                        "snapshot save failed, retrying: {err}"
                    );
                    std::thread::sleep(delay);
                    delay *= 3;
                }
                Err(err) => {
                    tracing::error!(room_id = %snapshot.id, "snapshot save failed, giving up: {err}");
                }
            }
        }
    });
}
