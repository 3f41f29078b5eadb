//! Random draws that reproduce the true deck probabilities.

use crate::action::{Card, Position, CARDS};
use crate::board::{empty_cells, Board, Deck};
use rand::seq::SliceRandom;
use rand::Rng;

/// Draw one card value with probability proportional to its remaining count.
///
/// # Panics
/// Panics if the deck is empty.
pub fn sample_card<R: Rng + ?Sized>(deck: &Deck, rng: &mut R) -> Card {
    match CARDS.choose_weighted(rng, |&c| deck.count(c) as u32) {
        Ok(&c) => c,
        Err(e) => panic!("cannot draw from deck {:?}: {}", deck, e),
    }
}

/// Uniformly pick an empty cell.
///
/// # Panics
/// Panics if the board is full.
pub fn sample_empty_cell<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Position {
    match empty_cells(board).choose(rng) {
        Some(&p) => p,
        None => panic!("no empty cell on a full board"),
    }
}

/// The full 52-card deck in random order.
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut cards = Deck::full().to_cards();
    cards.shuffle(rng);
    cards
}

/// SplitMix64 finalizer, used to derive independent per-game seeds.
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
