//! Automated judging: an external collaborator behind a trait, always
//! invoked as a bounded, cancellable task so it can never hold a room's
//! serialization point while waiting on a network call.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::IteratorRandom;

use crate::catalog::Card;
use crate::error::GameError;

/// Picks a round winner from the current submissions. Implementations may
/// block (an HTTP call to a model, say); callers run them off the async
/// executor via [`judge_with_timeout`].
pub trait AutoJudge: Send + Sync {
    fn pick_winner(
        &self,
        prompt: &Card,
        submissions: &BTreeMap<String, Card>,
    ) -> Result<(String, Card), GameError>;
}

/// A judge with no taste: picks a submitter uniformly at random. Useful for
/// local play and tests.
pub struct RandomJudge;

impl AutoJudge for RandomJudge {
    fn pick_winner(
        &self,
        _prompt: &Card,
        submissions: &BTreeMap<String, Card>,
    ) -> Result<(String, Card), GameError> {
        submissions
            .iter()
            .choose(&mut rand::thread_rng())
            .map(|(name, card)| (name.clone(), card.clone()))
            .ok_or(GameError::ExternalJudgeFailure(
                "no submissions to judge".to_string(),
            ))
    }
}

/// Runs `judge` on the blocking pool with a hard deadline. Timeouts, panics,
/// and judge errors all collapse into `ExternalJudgeFailure`; the room stays
/// `InProgress` so a human czar can still resolve the round.
pub async fn judge_with_timeout(
    judge: Arc<dyn AutoJudge>,
    prompt: Card,
    submissions: BTreeMap<String, Card>,
    limit: Duration,
) -> Result<(String, Card), GameError> {
    let task =
        tokio::task::spawn_blocking(move || judge.pick_winner(&prompt, &submissions));
    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(GameError::ExternalJudgeFailure(format!(
            "judge task failed: {join_err}"
        ))),
        Err(_) => Err(GameError::ExternalJudgeFailure(format!(
            "judge timed out after {limit:?}"
        ))),
    }
}
