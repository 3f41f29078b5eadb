//! Card, position and action primitives.
//!
//! Cards are `1..=13`; `0` marks an empty cell. A turn either commits to a card value
//! (two-phase model) or places the committed card on an empty `(row, col)`.

use serde::{Deserialize, Serialize};

/// A card value. `EMPTY` (0) denotes an unfilled cell.
pub type Card = u8;

/// Final (or partial) board score.
pub type Reward = u32;

pub const BOARD_SIZE: usize = 5;
pub const CELLS: usize = BOARD_SIZE * BOARD_SIZE;
pub const MAX_CARD: Card = 13;
pub const EMPTY: Card = 0;
/// Every card value exists exactly this many times in the shared deck.
pub const COPIES_PER_CARD: u8 = 4;

/// All playable card values in ascending order.
pub const CARDS: [Card; MAX_CARD as usize] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

/// True if `card` is a playable value (1..=13).
#[inline]
pub fn is_playable(card: Card) -> bool {
    (1..=MAX_CARD).contains(&card)
}

/// A cell on the 5x5 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// # Panics
    /// Panics if `row` or `col` is outside the board.
    pub fn new(row: u8, col: u8) -> Self {
        assert!(
            (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE,
            "position out of range: ({}, {})",
            row,
            col
        );
        Self { row, col }
    }

    /// Position of the row-major cell index `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= 25`.
    pub fn from_index(idx: usize) -> Self {
        assert!(idx < CELLS, "cell index out of range: {}", idx);
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One decision in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Commit to the given card value (card-choice phase).
    Card(Card),
    /// Place the committed card on the given cell (position phase).
    Place(Position),
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Card(c) => write!(f, "card {}", c),
            Action::Place(p) => write!(f, "place {}", p),
        }
    }
}
