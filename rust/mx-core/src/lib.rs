//! mx-core: Mathematico rules, scoring, reversible state, and configuration.

pub mod action;
pub mod board;
pub mod chance;
pub mod config;
pub mod journal;
pub mod legal;
pub mod scoring;
pub mod state;

pub use action::{
    is_playable, Action, Card, Position, Reward, BOARD_SIZE, CARDS, CELLS, COPIES_PER_CARD, EMPTY,
    MAX_CARD,
};
pub use board::{
    cell, empty_cells, find_deck, occurrences, Board, BoardError, Deck, Line, EMPTY_BOARD,
};
pub use chance::{sample_card, sample_empty_cell, shuffled_deck, splitmix64};
pub use config::{AgentKind, ArenaConfig, Config, ConfigError, RolloutKind, SearchConfig, Variant};
pub use journal::{Journal, Step};
pub use legal::{legal_actions, legal_placements};
pub use scoring::{line_scores, lines, score_board, score_line, NUM_LINES};
pub use state::{GameState, Phase};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}

#[cfg(test)]
mod chance_tests;
