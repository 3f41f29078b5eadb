//! Scope-bound undo log over a borrowed [`GameState`].
//!
//! Every mutation goes through the journal. Dropping the journal undoes whatever is
//! still recorded, newest first, so a round can never leak mutations into the next one
//! (this also runs while unwinding from a panic).

use crate::action::{Action, Card, Position};
use crate::state::GameState;

/// One recorded mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Phase-aware action (`GameState::apply`).
    Applied { action: Action, card: Card },
    /// Direct draw-and-place (`GameState::place`).
    Placed { pos: Position, card: Card },
}

impl Step {
    /// The step as an `(action, card)` edge; a direct placement reads as `Place`.
    pub fn edge(&self) -> (Action, Card) {
        match *self {
            Step::Applied { action, card } => (action, card),
            Step::Placed { pos, card } => (Action::Place(pos), card),
        }
    }
}

pub struct Journal<'s> {
    state: &'s mut GameState,
    steps: Vec<Step>,
}

impl<'s> Journal<'s> {
    pub fn new(state: &'s mut GameState) -> Self {
        Self {
            state,
            steps: Vec::with_capacity(2 * crate::CELLS),
        }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Number of steps not yet undone.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn apply(&mut self, action: Action) -> Card {
        let card = self.state.apply(action);
        self.steps.push(Step::Applied { action, card });
        card
    }

    pub fn place(&mut self, pos: Position, card: Card) {
        self.state.place(pos, card);
        self.steps.push(Step::Placed { pos, card });
    }

    /// Undo the most recent step, if any, and return it.
    pub fn undo_last(&mut self) -> Option<Step> {
        let step = self.steps.pop()?;
        match step {
            Step::Applied { action, card } => self.state.undo(action, card),
            Step::Placed { pos, card } => self.state.unplace(pos, card),
        }
        Some(step)
    }

    /// A child journal over the same state. Its steps are undone when it is dropped,
    /// leaving this journal's steps untouched.
    pub fn nested(&mut self) -> Journal<'_> {
        Journal::new(self.state)
    }
}

impl Drop for Journal<'_> {
    fn drop(&mut self) {
        while self.undo_last().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Board, EMPTY_BOARD};

    fn start() -> GameState {
        let mut b: Board = EMPTY_BOARD;
        b[0][0] = 5;
        GameState::new(b, None).unwrap()
    }

    #[test]
    fn drop_restores_state() {
        let mut s = start();
        let before = s;
        {
            let mut j = Journal::new(&mut s);
            j.place(Position::new(1, 1), 7);
            j.apply(Action::Card(3));
            j.apply(Action::Place(Position::new(2, 2)));
            assert_eq!(j.depth(), 3);
            assert_eq!(j.state().board()[2][2], 3);
        }
        assert_eq!(s, before);
    }

    #[test]
    fn undo_last_is_lifo() {
        let mut s = start();
        let mut j = Journal::new(&mut s);
        j.apply(Action::Card(9));
        j.apply(Action::Place(Position::new(4, 4)));
        assert_eq!(
            j.undo_last(),
            Some(Step::Applied {
                action: Action::Place(Position::new(4, 4)),
                card: 9
            })
        );
        assert_eq!(j.state().committed(), Some(9));
        assert_eq!(
            j.undo_last(),
            Some(Step::Applied {
                action: Action::Card(9),
                card: 9
            })
        );
        assert_eq!(j.undo_last(), None);
    }

    #[test]
    fn nested_journal_only_undoes_its_own_steps() {
        let mut s = start();
        let before = s;
        {
            let mut outer = Journal::new(&mut s);
            outer.place(Position::new(0, 1), 2);
            let after_outer = *outer.state();
            {
                let mut inner = outer.nested();
                inner.place(Position::new(0, 2), 4);
                inner.place(Position::new(0, 3), 4);
            }
            assert_eq!(*outer.state(), after_outer);
            assert_eq!(outer.depth(), 1);
        }
        assert_eq!(s, before);
    }

    #[test]
    fn state_is_restored_after_panic_inside_round() {
        let mut s = start();
        let before = s;
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut j = Journal::new(&mut s);
            j.place(Position::new(3, 3), 1);
            // Occupied cell: contract violation.
            j.place(Position::new(3, 3), 2);
        }));
        assert!(res.is_err());
        assert_eq!(s, before);
    }
}
