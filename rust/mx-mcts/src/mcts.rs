//! UCB1 Monte Carlo Tree Search over a live, journaled game state.
//!
//! Each round walks the tree from the root through a fresh [`Journal`], expands at most
//! one node, values the leaf with a [`RolloutPolicy`] and backs the reward up the path,
//! undoing one journal step per node. The state handed to [`Mcts::run_search`] is
//! identical before and after every round.

use crate::arena::Arena;
use crate::model::{GameModel, SinglePhase, TwoPhase};
use crate::node::{Node, NodeId, ROOT};
use crate::rollout::{policy_for, RolloutPolicy};
use mx_core::{
    score_board, Action, Board, BoardError, Card, GameState, Journal, Reward, SearchConfig,
    Variant,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// Rounds between two reads of the wall clock. The time budget can be overshot by up to
/// this many rounds minus one.
pub const CLOCK_CHECK_INTERVAL: u32 = 100;

#[derive(Clone, Copy, Debug)]
pub struct MctsConfig {
    /// UCB1 exploration constant `C`.
    pub exploration: f64,
    pub max_simulations: u32,
    pub max_time_ms: u64,
    /// Seeds expansion-order shuffles, edge draws and rollouts.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for MctsConfig {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            exploration: cfg.exploration,
            max_simulations: cfg.max_simulations,
            max_time_ms: cfg.max_time_ms,
            seed: cfg.seed,
        }
    }
}

#[derive(Debug, Error)]
pub enum MctsError {
    #[error("invalid config: {msg}")]
    InvalidConfig { msg: &'static str },
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    #[error("single-phase search needs a committed card")]
    MissingCard,
    #[error("board is already full; nothing to search")]
    TerminalRoot,
    #[error("search budget exhausted before any round completed")]
    NoSimulations,
}

#[derive(Default, Clone, Debug)]
pub struct SearchStats {
    pub node_count: usize,
    pub expansions: u32,
    /// Rounds whose leaf was a finished board.
    pub terminal_leaves: u32,
    /// Deepest leaf reached, in edges from the root.
    pub max_depth: usize,
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    pub action: Action,
    /// Mean backed-up reward of the chosen child.
    pub expected_reward: f64,
    pub simulations: u32,
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

pub struct Mcts<M: GameModel> {
    model: M,
    cfg: MctsConfig,
    arena: Arena,
    rng: ChaCha8Rng,
    stats: SearchStats,
}

impl<M: GameModel> Mcts<M> {
    pub fn new(model: M, cfg: MctsConfig) -> Result<Self, MctsError> {
        if !(cfg.exploration.is_finite() && cfg.exploration >= 0.0) {
            return Err(MctsError::InvalidConfig {
                msg: "exploration must be finite and >= 0",
            });
        }
        if cfg.max_simulations == 0 {
            return Err(MctsError::InvalidConfig {
                msg: "max_simulations must be > 0",
            });
        }
        Ok(Self {
            model,
            cfg,
            arena: Arena::new(),
            rng: ChaCha8Rng::seed_from_u64(cfg.seed),
            stats: SearchStats::default(),
        })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.cfg
    }

    /// The tree grown by the last search.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn root_children(&self) -> &[NodeId] {
        if self.arena.is_empty() {
            return &[];
        }
        &self.arena.get(ROOT).children
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Run one search from `state` and recommend the root edge with the best mean reward.
    ///
    /// The tree of a previous call is discarded and the RNG reseeded, so equal inputs give
    /// equal results under an iteration budget. `state` is borrowed mutably for the
    /// duration of the call and returned unchanged.
    pub fn run_search<P>(
        &mut self,
        state: &mut GameState,
        rollout: &mut P,
    ) -> Result<SearchResult, MctsError>
    where
        P: RolloutPolicy + ?Sized,
    {
        if state.is_terminal() {
            return Err(MctsError::TerminalRoot);
        }
        self.model.check_root(state)?;

        self.arena.clear();
        self.stats = SearchStats::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.cfg.seed);

        let untried = self.model.expansion_order(state, &mut self.rng);
        self.arena.push(Node::root(state.moves_to_make(), untried));

        let budget = Duration::from_millis(self.cfg.max_time_ms);
        let start = Instant::now();
        let mut simulations: u32 = 0;
        while simulations < self.cfg.max_simulations {
            if simulations % CLOCK_CHECK_INTERVAL == 0 {
                let elapsed = start.elapsed();
                trace!(
                    simulations,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "clock check"
                );
                if elapsed >= budget {
                    break;
                }
            }
            self.execute_round(state, rollout);
            simulations += 1;
        }
        let elapsed = start.elapsed();
        self.stats.node_count = self.arena.len();

        if simulations == 0 {
            return Err(MctsError::NoSimulations);
        }

        let best = self.arena.get(self.best_child(ROOT, 0.0));
        let (action, _) = best.edge();
        let expected_reward = best.mean_reward();

        debug!(
            simulations,
            nodes = self.stats.node_count,
            max_depth = self.stats.max_depth,
            elapsed_ms = elapsed.as_millis() as u64,
            action = %action,
            expected_reward,
            "search finished"
        );

        Ok(SearchResult {
            action,
            expected_reward,
            simulations,
            elapsed,
            stats: self.stats.clone(),
        })
    }

    fn execute_round<P>(&mut self, state: &mut GameState, rollout: &mut P)
    where
        P: RolloutPolicy + ?Sized,
    {
        #[cfg(debug_assertions)]
        let before = *state;
        {
            let mut journal = Journal::new(state);
            let leaf = self.select(&mut journal);
            let leaf = if self.arena.get(leaf).is_terminal() {
                leaf
            } else {
                self.expand(leaf, &mut journal)
            };
            self.stats.max_depth = self.stats.max_depth.max(journal.depth());

            let reward = if self.arena.get(leaf).is_terminal() {
                self.stats.terminal_leaves += 1;
                score_board(journal.state().board())
            } else {
                rollout.rollout(&mut journal, &mut self.rng)
            };
            self.backpropagate(leaf, reward, &mut journal);
            debug_assert_eq!(journal.depth(), 0, "backpropagation left steps behind");
        }
        #[cfg(debug_assertions)]
        debug_assert_eq!(*state, before, "round leaked a state mutation");
    }

    /// Descend through fully expanded nodes until one is unexpanded or terminal.
    fn select(&self, journal: &mut Journal<'_>) -> NodeId {
        let mut id = ROOT;
        loop {
            let node = self.arena.get(id);
            if node.is_terminal() || !node.is_expanded() {
                return id;
            }
            let child = self.best_child(id, self.cfg.exploration);
            let (action, card) = self.arena.get(child).edge();
            self.model.descend(journal, action, card);
            id = child;
        }
    }

    /// Pop one untried action of `id`, play it and append the resulting child.
    ///
    /// # Panics
    /// Panics if `id` has no untried actions.
    fn expand(&mut self, id: NodeId, journal: &mut Journal<'_>) -> NodeId {
        let action = match self.arena.get_mut(id).untried.pop() {
            Some(a) => a,
            None => panic!("expand on node {} with no untried actions", id),
        };
        let card = self.model.edge_card(journal.state(), action, &mut self.rng);
        self.model.descend(journal, action, card);

        let after = journal.state();
        let untried = self.model.expansion_order(after, &mut self.rng);
        let child = self.arena.push(Node::child(
            id,
            action,
            card,
            after.moves_to_make(),
            untried,
        ));
        self.arena.get_mut(id).children.push(child);
        self.stats.expansions += 1;
        child
    }

    /// Update every node from `leaf` up to (not including) the root and undo its edge.
    fn backpropagate(&mut self, leaf: NodeId, reward: Reward, journal: &mut Journal<'_>) {
        let mut id = leaf;
        while let Some(parent) = self.arena.get(id).parent {
            let node = self.arena.get_mut(id);
            node.visits += 1;
            node.reward += u64::from(reward);
            let step = journal.undo_last();
            debug_assert_eq!(step.map(|s| s.edge()), Some(node.edge()));
            id = parent;
        }
    }

    /// Child of `id` with the highest UCB1 value; the first strict maximum wins ties.
    ///
    /// # Panics
    /// Panics if `id` has no children.
    pub fn best_child(&self, id: NodeId, exploration: f64) -> NodeId {
        let node = self.arena.get(id);
        assert!(
            !node.children.is_empty(),
            "best_child on node {} without children",
            id
        );
        let mut best = node.children[0];
        let mut best_value = f64::NEG_INFINITY;
        for &c in &node.children {
            let v = self.arena.get(c).ucb(node.visits, exploration);
            if v > best_value {
                best = c;
                best_value = v;
            }
        }
        best
    }
}

/// Search from an externally supplied board with the configured model and rollout.
///
/// The deck is derived from the board. `committed` is the card already drawn, if any;
/// the single-phase model requires one.
pub fn search(
    board: &Board,
    committed: Option<Card>,
    cfg: &SearchConfig,
) -> Result<SearchResult, MctsError> {
    let mut state = GameState::new(*board, committed)?;
    let mut rollout = policy_for(cfg.rollout);
    search_with(&mut state, cfg.variant, &MctsConfig::from(cfg), rollout.as_mut())
}

/// Search with a caller-supplied rollout policy.
pub fn search_with<P>(
    state: &mut GameState,
    variant: Variant,
    cfg: &MctsConfig,
    rollout: &mut P,
) -> Result<SearchResult, MctsError>
where
    P: RolloutPolicy + ?Sized,
{
    match variant {
        Variant::SinglePhase => Mcts::new(SinglePhase, *cfg)?.run_search(state, rollout),
        Variant::TwoPhase => Mcts::new(TwoPhase, *cfg)?.run_search(state, rollout),
    }
}
