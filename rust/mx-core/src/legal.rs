//! Legal action enumeration.

use crate::action::Action;
use crate::board::empty_cells;
use crate::state::{GameState, Phase};

/// All legal actions for the state's phase, each exactly once, in canonical order
/// (row-major cells, or ascending card values).
///
/// - `PlaceCard`: one `Place` per empty cell.
/// - `ChooseCard`: one `Card` per value with copies left.
/// - Terminal states have no legal actions.
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    if state.is_terminal() {
        return Vec::new();
    }
    match state.phase() {
        Phase::PlaceCard => empty_cells(state.board())
            .into_iter()
            .map(Action::Place)
            .collect(),
        Phase::ChooseCard => state.deck().available().map(Action::Card).collect(),
    }
}

/// Placements only, regardless of phase (single-phase model).
pub fn legal_placements(state: &GameState) -> Vec<Action> {
    empty_cells(state.board())
        .into_iter()
        .map(Action::Place)
        .collect()
}
