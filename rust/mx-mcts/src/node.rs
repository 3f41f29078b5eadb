//! Tree node statistics and the UCB1 value.

use mx_core::{Action, Card, EMPTY};

pub type NodeId = u32;

/// The root is always the first node pushed into a fresh arena.
pub const ROOT: NodeId = 0;

#[derive(Clone, Debug)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Actions not yet expanded, in the random order fixed at creation. Popped from the back.
    pub untried: Vec<Action>,
    /// Edge from the parent (`None` for the root).
    pub action: Option<Action>,
    /// Card carried by that edge (`EMPTY` for the root).
    pub card: Card,
    /// Cells still empty at this node.
    pub moves_to_make: u8,
    pub visits: u32,
    pub reward: u64,
}

impl Node {
    pub fn root(moves_to_make: u8, untried: Vec<Action>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            untried,
            action: None,
            card: EMPTY,
            moves_to_make,
            visits: 0,
            reward: 0,
        }
    }

    pub fn child(
        parent: NodeId,
        action: Action,
        card: Card,
        moves_to_make: u8,
        untried: Vec<Action>,
    ) -> Self {
        Self {
            parent: Some(parent),
            children: Vec::new(),
            untried,
            action: Some(action),
            card,
            moves_to_make,
            visits: 0,
            reward: 0,
        }
    }

    /// No further moves possible below this node.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.moves_to_make == 0
    }

    /// Every legal action has a child.
    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// The edge that produced this node.
    ///
    /// # Panics
    /// Panics on the root.
    pub fn edge(&self) -> (Action, Card) {
        match self.action {
            Some(a) => (a, self.card),
            None => panic!("the root node has no incoming edge"),
        }
    }

    /// Average backed-up reward, 0 when unvisited.
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.reward as f64 / self.visits as f64
        }
    }

    /// UCB1 with +1 smoothing on both visit terms:
    /// `reward / (n + 1) + c * sqrt(2 ln(N + 1) / (n + 1))`.
    pub fn ucb(&self, parent_visits: u32, exploration: f64) -> f64 {
        let n = self.visits as f64 + 1.0;
        let exploit = self.reward as f64 / n;
        if exploration == 0.0 {
            return exploit;
        }
        exploit + exploration * (2.0 * (parent_visits as f64 + 1.0).ln() / n).sqrt()
    }
}
