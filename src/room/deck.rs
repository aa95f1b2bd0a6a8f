//! Deck and hand management: deals response hands without short-term
//! repeats, tracked per room through the used-card pool.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Card, Catalog};
use crate::error::GameError;
use crate::room::state::RoomState;

/// Cards dealt per hand.
pub const HAND_SIZE: usize = 5;

/// Deals a fresh hand of `size` response cards to `player`, replacing any
/// previous hand outright.
///
/// Cards the player still held are returned to the pool first (removed from
/// `used_cards`), so repeated redraws cannot starve it. When fewer than
/// `size` unused cards remain, the pool resets to empty and the full catalog
/// is sampled again; previously dealt-but-unplayed cards may then reappear.
pub fn deal_hand(
    state: &mut RoomState,
    catalog: &Catalog,
    player: &str,
    size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Card>, GameError> {
    let responses = catalog.responses();
    if responses.len() < size {
        return Err(GameError::CatalogExhausted {
            needed: size,
            have: responses.len(),
        });
    }

    if let Some(old) = state.player_hands.remove(player) {
        for card in &old {
            state.used_cards.remove(&card.text);
        }
    }

    let mut available: Vec<&Card> = responses
        .iter()
        .filter(|c| !state.used_cards.contains(&c.text))
        .collect();
    if available.len() < size {
        state.used_cards.clear();
        available = responses.iter().collect();
    }

    let hand: Vec<Card> = available
        .choose_multiple(rng, size)
        .map(|c| (*c).clone())
        .collect();
    for card in &hand {
        state.used_cards.insert(card.text.clone());
    }
    state.player_hands.insert(player.to_string(), hand.clone());
    Ok(hand)
}
