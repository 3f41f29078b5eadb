//! Board and deck types, plus deck derivation from an externally supplied board.

use crate::action::{is_playable, Card, Position, BOARD_SIZE, CARDS, COPIES_PER_CARD, EMPTY, MAX_CARD};
use thiserror::Error;

pub type Line = [Card; BOARD_SIZE];
pub type Board = [Line; BOARD_SIZE];

/// An all-empty board.
pub const EMPTY_BOARD: Board = [[EMPTY; BOARD_SIZE]; BOARD_SIZE];

/// Remaining count per card value. Index 0 is unused and always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deck([u8; MAX_CARD as usize + 1]);

impl Deck {
    /// A fresh deck: four copies of every value.
    pub fn full() -> Self {
        let mut counts = [COPIES_PER_CARD; MAX_CARD as usize + 1];
        counts[EMPTY as usize] = 0;
        Self(counts)
    }

    /// # Panics
    /// Panics if `card` is not a playable value.
    #[inline]
    pub fn count(&self, card: Card) -> u8 {
        assert!(is_playable(card), "card out of range: {}", card);
        self.0[card as usize]
    }

    /// Total number of cards left.
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&c| c as u32).sum()
    }

    /// Remove one copy of `card`.
    ///
    /// # Panics
    /// Panics if `card` is out of range or has no copies left.
    pub fn take(&mut self, card: Card) {
        let n = self.count(card);
        assert!(n > 0, "card {} has no copies left in the deck", card);
        self.0[card as usize] = n - 1;
    }

    /// Return one copy of `card`.
    ///
    /// # Panics
    /// Panics if `card` is out of range or already has all four copies.
    pub fn put_back(&mut self, card: Card) {
        let n = self.count(card);
        assert!(n < COPIES_PER_CARD, "card {} already has all copies in the deck", card);
        self.0[card as usize] = n + 1;
    }

    /// `(card, remaining)` pairs for every playable value, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Card, u8)> + '_ {
        CARDS.iter().map(move |&c| (c, self.0[c as usize]))
    }

    /// Cards with at least one copy left, ascending.
    pub fn available(&self) -> impl Iterator<Item = Card> + '_ {
        self.iter().filter(|&(_, n)| n > 0).map(|(c, _)| c)
    }

    /// Expand into a multiset: each card repeated by its remaining count.
    pub fn to_cards(&self) -> Vec<Card> {
        let mut out = Vec::with_capacity(self.total() as usize);
        for (c, n) in self.iter() {
            out.extend(std::iter::repeat(c).take(n as usize));
        }
        out
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("cell ({row}, {col}) holds {value}, expected 0..=13")]
    CardOutOfRange { row: usize, col: usize, value: Card },
    #[error("card {card} appears {count} times, at most 4 allowed")]
    TooManyCopies { card: Card, count: u8 },
    #[error("committed card {card} is out of range 1..=13")]
    CommittedOutOfRange { card: Card },
    #[error("committed card {card} has no copies left")]
    CommittedExhausted { card: Card },
    #[error("committed card given but the board has no empty cell")]
    NoEmptyCell,
}

/// Value stored at `pos`.
#[inline]
pub fn cell(board: &Board, pos: Position) -> Card {
    board[pos.row as usize][pos.col as usize]
}

/// All empty cells in row-major order.
pub fn empty_cells(board: &Board) -> Vec<Position> {
    let mut out = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
    for (r, row) in board.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            if v == EMPTY {
                out.push(Position {
                    row: r as u8,
                    col: c as u8,
                });
            }
        }
    }
    out
}

/// Number of times `card` appears on the board.
pub fn occurrences(board: &Board, card: Card) -> u8 {
    board.iter().flatten().filter(|&&v| v == card).count() as u8
}

/// Derive the remaining deck and the number of empty cells from a board.
///
/// Each value starts with four copies minus its occurrences on the board.
pub fn find_deck(board: &Board) -> Result<(Deck, u8), BoardError> {
    let mut deck = Deck::full();
    let mut moves_to_make = 0u8;
    for (r, row) in board.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            if v == EMPTY {
                moves_to_make += 1;
                continue;
            }
            if !is_playable(v) {
                return Err(BoardError::CardOutOfRange {
                    row: r,
                    col: c,
                    value: v,
                });
            }
            if deck.count(v) == 0 {
                return Err(BoardError::TooManyCopies {
                    card: v,
                    count: occurrences(board, v),
                });
            }
            deck.take(v);
        }
    }
    Ok((deck, moves_to_make))
}
