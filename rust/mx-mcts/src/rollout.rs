//! Rollout policies: value a freshly expanded node.
//!
//! A policy may mutate the live state only through the journal it is given, and must
//! leave it exactly as found.

use crate::playout::{random_fill, sample_action};
use mx_core::{score_board, Board, Deck, Journal, Reward, RolloutKind};
use rand_chacha::ChaCha8Rng;

pub trait RolloutPolicy {
    fn rollout(&mut self, journal: &mut Journal<'_>, rng: &mut ChaCha8Rng) -> Reward;
}

/// One-shot random fill of every empty cell, then a single scoring call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFill;

impl RolloutPolicy for RandomFill {
    fn rollout(&mut self, journal: &mut Journal<'_>, rng: &mut ChaCha8Rng) -> Reward {
        let s = journal.state();
        score_board(&random_fill(s.board(), s.deck(), s.committed(), rng))
    }
}

/// Explicit playout through the phase state machine, undone afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stepwise;

impl RolloutPolicy for Stepwise {
    fn rollout(&mut self, journal: &mut Journal<'_>, rng: &mut ChaCha8Rng) -> Reward {
        let mut scratch = journal.nested();
        while !scratch.state().is_terminal() {
            let action = sample_action(scratch.state(), rng);
            scratch.apply(action);
        }
        score_board(scratch.state().board())
    }
}

/// Score of the board as it stands. Cheap heuristic; empty cells count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialScore;

impl RolloutPolicy for PartialScore {
    fn rollout(&mut self, journal: &mut Journal<'_>, _rng: &mut ChaCha8Rng) -> Reward {
        score_board(journal.state().board())
    }
}

/// Adapts a caller-supplied `(board, deck, rng) -> reward` function.
pub struct PolicyFn<F>(pub F);

impl<F> RolloutPolicy for PolicyFn<F>
where
    F: FnMut(&Board, &Deck, &mut ChaCha8Rng) -> Reward,
{
    fn rollout(&mut self, journal: &mut Journal<'_>, rng: &mut ChaCha8Rng) -> Reward {
        let s = journal.state();
        (self.0)(s.board(), s.deck(), rng)
    }
}

/// Boxed policy for a configured kind.
pub fn policy_for(kind: RolloutKind) -> Box<dyn RolloutPolicy> {
    match kind {
        RolloutKind::RandomFill => Box::new(RandomFill),
        RolloutKind::Stepwise => Box::new(Stepwise),
        RolloutKind::PartialScore => Box::new(PartialScore),
    }
}
