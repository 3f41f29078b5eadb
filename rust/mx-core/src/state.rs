//! Mutable, reversible game state shared by every round of one search.
//!
//! `apply`/`undo` and `place`/`unplace` are exact inverses and must be used in strict
//! LIFO order. Committing a card (two-phase model) only records the choice; the deck is
//! decremented when the card lands on the board, so `deck[v] + occurrences(v) == 4`
//! holds at every instant.

use crate::action::{is_playable, Action, Card, Position, CARDS, COPIES_PER_CARD, EMPTY};
use crate::board::{cell, find_deck, occurrences, Board, BoardError, Deck};

/// Which kind of decision is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No card committed; the next action is `Action::Card`.
    ChooseCard,
    /// A card is committed; the next action is `Action::Place`.
    PlaceCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    deck: Deck,
    committed: Option<Card>,
    /// Empty cells left.
    moves_to_make: u8,
}

impl GameState {
    /// Build a state from an external board, deriving the deck from board occupancy.
    pub fn new(board: Board, committed: Option<Card>) -> Result<Self, BoardError> {
        let (deck, moves_to_make) = find_deck(&board)?;
        if let Some(card) = committed {
            if !is_playable(card) {
                return Err(BoardError::CommittedOutOfRange { card });
            }
            if deck.count(card) == 0 {
                return Err(BoardError::CommittedExhausted { card });
            }
            if moves_to_make == 0 {
                return Err(BoardError::NoEmptyCell);
            }
        }
        Ok(Self {
            board,
            deck,
            committed,
            moves_to_make,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn committed(&self) -> Option<Card> {
        self.committed
    }

    pub fn moves_to_make(&self) -> u8 {
        self.moves_to_make
    }

    pub fn phase(&self) -> Phase {
        if self.committed.is_some() {
            Phase::PlaceCard
        } else {
            Phase::ChooseCard
        }
    }

    /// All 25 cells filled.
    pub fn is_terminal(&self) -> bool {
        self.moves_to_make == 0
    }

    /// Apply a phase-aware action and return the card it involves.
    ///
    /// # Panics
    /// Panics if the action does not match the current phase, the card is out of range
    /// or exhausted, or the target cell is occupied.
    pub fn apply(&mut self, action: Action) -> Card {
        match action {
            Action::Card(card) => {
                assert!(
                    self.committed.is_none(),
                    "cannot commit {} while {:?} is committed",
                    card,
                    self.committed
                );
                assert!(is_playable(card), "card out of range: {}", card);
                assert!(self.deck.count(card) > 0, "card {} has no copies left", card);
                assert!(self.moves_to_make > 0, "no empty cell left for card {}", card);
                self.committed = Some(card);
                card
            }
            Action::Place(pos) => {
                let card = match self.committed {
                    Some(c) => c,
                    None => panic!("place at {} without a committed card", pos),
                };
                self.write(pos, card);
                self.committed = None;
                card
            }
        }
    }

    /// Exact inverse of the most recent, not yet undone `apply(action)` that returned `card`.
    ///
    /// # Panics
    /// Panics if the state does not look like `action` was the last applied step.
    pub fn undo(&mut self, action: Action, card: Card) {
        match action {
            Action::Card(c) => {
                assert_eq!(c, card, "card action {} undone with card {}", c, card);
                assert_eq!(
                    self.committed,
                    Some(card),
                    "undo commit of {} but {:?} is committed",
                    card,
                    self.committed
                );
                self.committed = None;
            }
            Action::Place(pos) => {
                assert!(
                    self.committed.is_none(),
                    "undo placement at {} while {:?} is committed",
                    pos,
                    self.committed
                );
                self.erase(pos, card);
                self.committed = Some(card);
            }
        }
    }

    /// Draw `card` from the deck and write it at `pos` in one step (single-phase model).
    ///
    /// # Panics
    /// Panics if a card is committed, the cell is occupied, or `card` is unavailable.
    pub fn place(&mut self, pos: Position, card: Card) {
        assert!(
            self.committed.is_none(),
            "direct placement at {} while {:?} is committed",
            pos,
            self.committed
        );
        self.write(pos, card);
    }

    /// Exact inverse of [`GameState::place`].
    pub fn unplace(&mut self, pos: Position, card: Card) {
        self.erase(pos, card);
    }

    fn write(&mut self, pos: Position, card: Card) {
        let (r, c) = (pos.row as usize, pos.col as usize);
        assert_eq!(self.board[r][c], EMPTY, "cell {} is already occupied", pos);
        // Deck::take asserts range and availability.
        self.deck.take(card);
        self.board[r][c] = card;
        self.moves_to_make -= 1;
    }

    fn erase(&mut self, pos: Position, card: Card) {
        assert_eq!(
            cell(&self.board, pos),
            card,
            "cell {} does not hold {}",
            pos,
            card
        );
        self.board[pos.row as usize][pos.col as usize] = EMPTY;
        self.deck.put_back(card);
        self.moves_to_make += 1;
    }

    /// `deck[v] + occurrences(v) == 4` for every value.
    pub fn deck_is_consistent(&self) -> bool {
        CARDS
            .iter()
            .all(|&v| self.deck.count(v) + occurrences(&self.board, v) == COPIES_PER_CARD)
    }
}
