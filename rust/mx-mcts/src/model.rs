//! Game models: how the tree enumerates, realizes and replays edges.
//!
//! A model is picked once per search and fixed through the `Mcts<M>` type parameter.

use crate::mcts::MctsError;
use mx_core::{legal_actions, legal_placements, sample_card, Action, Card, GameState, Journal};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

pub trait GameModel {
    /// Reject root states this model cannot search from.
    fn check_root(&self, state: &GameState) -> Result<(), MctsError>;

    /// Every legal action at `state` exactly once, shuffled once for the new node.
    fn expansion_order(&self, state: &GameState, rng: &mut ChaCha8Rng) -> Vec<Action>;

    /// The card an edge carries when it is first expanded from `state`.
    fn edge_card(&self, state: &GameState, action: Action, rng: &mut ChaCha8Rng) -> Card;

    /// Replay an edge on the live state.
    fn descend(&self, journal: &mut Journal<'_>, action: Action, card: Card);
}

/// Every edge puts one card on one cell.
///
/// Root edges place the committed card. Deeper edges draw their card from the remaining
/// deck when first expanded; the drawn card is stored on the child and replayed on every
/// later descent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePhase;

impl GameModel for SinglePhase {
    fn check_root(&self, state: &GameState) -> Result<(), MctsError> {
        if state.committed().is_none() {
            return Err(MctsError::MissingCard);
        }
        Ok(())
    }

    fn expansion_order(&self, state: &GameState, rng: &mut ChaCha8Rng) -> Vec<Action> {
        let mut actions = legal_placements(state);
        actions.shuffle(rng);
        actions
    }

    fn edge_card(&self, state: &GameState, _action: Action, rng: &mut ChaCha8Rng) -> Card {
        match state.committed() {
            Some(card) => card,
            None => sample_card(state.deck(), rng),
        }
    }

    fn descend(&self, journal: &mut Journal<'_>, action: Action, card: Card) {
        let pos = match action {
            Action::Place(pos) => pos,
            Action::Card(c) => panic!("single-phase tree holds a card edge ({})", c),
        };
        if journal.state().committed().is_some() {
            let placed = journal.apply(action);
            debug_assert_eq!(placed, card);
        } else {
            journal.place(pos, card);
        }
    }
}

/// Card-choice and position-choice nodes alternate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPhase;

impl GameModel for TwoPhase {
    fn check_root(&self, _state: &GameState) -> Result<(), MctsError> {
        Ok(())
    }

    fn expansion_order(&self, state: &GameState, rng: &mut ChaCha8Rng) -> Vec<Action> {
        let mut actions = legal_actions(state);
        actions.shuffle(rng);
        actions
    }

    fn edge_card(&self, state: &GameState, action: Action, _rng: &mut ChaCha8Rng) -> Card {
        match (action, state.committed()) {
            (Action::Card(c), _) => c,
            (Action::Place(_), Some(c)) => c,
            (Action::Place(pos), None) => panic!("place at {} without a committed card", pos),
        }
    }

    fn descend(&self, journal: &mut Journal<'_>, action: Action, card: Card) {
        let applied = journal.apply(action);
        debug_assert_eq!(applied, card);
    }
}
