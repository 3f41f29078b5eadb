//! UCB1 Monte Carlo Tree Search for Mathematico placement decisions.
//!
//! The design uses:
//! - Arena-backed node storage with parent handles
//! - One [`GameModel`] per search (single-phase placement or alternating card/position)
//! - A scope-bound undo journal over the live `mx_core::GameState`
//! - Interchangeable rollout policies

pub mod arena;
pub mod mcts;
pub mod model;
pub mod node;
pub mod playout;
pub mod rollout;

pub use arena::Arena;
pub use mcts::{
    search, search_with, Mcts, MctsConfig, MctsError, SearchResult, SearchStats,
    CLOCK_CHECK_INTERVAL,
};
pub use model::{GameModel, SinglePhase, TwoPhase};
pub use node::{Node, NodeId, ROOT};
pub use playout::{random_fill, sample_action};
pub use rollout::{policy_for, PartialScore, PolicyFn, RandomFill, RolloutPolicy, Stepwise};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod mcts_tests;
