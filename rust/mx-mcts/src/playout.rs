//! Playout strategy: random legal moves weighted by availability.

use mx_core::{
    empty_cells, sample_card, sample_empty_cell, Action, Board, Card, Deck, GameState, Phase,
    Position,
};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Sample one legal action: a uniform empty cell in the position phase, or a card with
/// probability proportional to its remaining count in the card phase.
///
/// # Panics
/// Panics on a terminal state.
pub fn sample_action(state: &GameState, rng: &mut ChaCha8Rng) -> Action {
    assert!(!state.is_terminal(), "no playout move on a terminal state");
    match state.phase() {
        Phase::PlaceCard => Action::Place(sample_empty_cell(state.board(), rng)),
        Phase::ChooseCard => Action::Card(sample_card(state.deck(), rng)),
    }
}

/// Fill every empty cell of a copy of `board` in one shuffle pass.
///
/// `committed`, if any, is placed first on a random empty cell; the remaining cells get
/// a uniformly random subset of the remaining deck. The distribution matches drawing
/// and placing one card at a time.
pub fn random_fill(
    board: &Board,
    deck: &Deck,
    committed: Option<Card>,
    rng: &mut ChaCha8Rng,
) -> Board {
    let mut out = *board;
    let mut cells: Vec<Position> = empty_cells(board);
    let mut cards = deck.to_cards();
    cells.shuffle(rng);

    let mut cells = cells.into_iter();
    if let Some(card) = committed {
        // The committed card is still counted in the deck until it is placed.
        if let Some(i) = cards.iter().position(|&c| c == card) {
            cards.swap_remove(i);
        }
        if let Some(p) = cells.next() {
            out[p.row as usize][p.col as usize] = card;
        }
    }

    cards.shuffle(rng);
    for (p, c) in cells.zip(cards) {
        out[p.row as usize][p.col as usize] = c;
    }
    out
}
