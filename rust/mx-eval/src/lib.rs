//! mx-eval: full Mathematico games with a pluggable agent + score statistics.
//!
//! A game shuffles the 52-card deck, deals 25 cards one at a time and asks the agent
//! where each goes. Arena runs repeat this over a deterministic seed schedule.

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use mx_core::{
    cell, sample_empty_cell, score_board, shuffled_deck, splitmix64, Action, AgentKind, Board,
    Card, Position, Reward, SearchConfig, BOARD_SIZE, CELLS, EMPTY, EMPTY_BOARD,
};
use mx_mcts::{search, MctsError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid arena config: {0}")]
    InvalidConfig(&'static str),
    #[error("search failed: {0}")]
    Search(#[from] MctsError),
    #[error("agent returned a non-placement action: {0}")]
    NotAPlacement(Action),
    #[error("agent chose {pos}, which is off the board or already filled")]
    IllegalPlacement { pos: Position },
}

/// A player that places one dealt card at a time.
pub trait Agent {
    /// Short label for logs and events.
    fn name(&self) -> &'static str;

    /// Called once before every game.
    fn reset(&mut self) {}

    /// Where to put `card` on `board`. Must return an empty cell.
    fn choose(&mut self, board: &Board, card: Card) -> Result<Position, EvalError>;
}

/// Searches every move with a fixed configuration.
///
/// The search seed is re-derived per move so consecutive searches do not share a
/// random stream.
pub struct MctsAgent {
    cfg: SearchConfig,
    move_index: u64,
}

impl MctsAgent {
    pub fn new(cfg: SearchConfig) -> Self {
        Self { cfg, move_index: 0 }
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn reset(&mut self) {
        self.move_index = 0;
    }

    fn choose(&mut self, board: &Board, card: Card) -> Result<Position, EvalError> {
        let cfg = SearchConfig {
            seed: splitmix64(self.cfg.seed ^ self.move_index),
            ..self.cfg.clone()
        };
        self.move_index += 1;
        match search(board, Some(card), &cfg)?.action {
            Action::Place(pos) => Ok(pos),
            other => Err(EvalError::NotAPlacement(other)),
        }
    }
}

/// Uniformly random empty cell.
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, board: &Board, _card: Card) -> Result<Position, EvalError> {
        Ok(sample_empty_cell(board, &mut self.rng))
    }
}

/// Agent for a configured kind.
pub fn agent_for(kind: AgentKind, search: &SearchConfig, seed: u64) -> Box<dyn Agent> {
    match kind {
        AgentKind::Mcts => Box::new(MctsAgent::new(SearchConfig {
            seed,
            ..search.clone()
        })),
        AgentKind::Random => Box::new(RandomAgent::new(seed)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub card: Card,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub board: Board,
    pub score: Reward,
    pub moves: Vec<Decision>,
}

/// Play one full game dealt from a deck shuffled with `seed`.
pub fn play_game<A: Agent + ?Sized>(agent: &mut A, seed: u64) -> Result<GameRecord, EvalError> {
    agent.reset();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let deal = shuffled_deck(&mut rng);

    let mut board = EMPTY_BOARD;
    let mut moves = Vec::with_capacity(CELLS);
    for &card in deal.iter().take(CELLS) {
        let pos = agent.choose(&board, card)?;
        let on_board = (pos.row as usize) < BOARD_SIZE && (pos.col as usize) < BOARD_SIZE;
        if !on_board || cell(&board, pos) != EMPTY {
            return Err(EvalError::IllegalPlacement { pos });
        }
        board[pos.row as usize][pos.col as usize] = card;
        moves.push(Decision { card, pos });
    }

    Ok(GameRecord {
        seed,
        board,
        score: score_board(&board),
        moves,
    })
}

/// Deterministic per-game seeds.
pub fn arena_seeds(seed0: u64, games: u32) -> Vec<u64> {
    (0..games).map(|i| splitmix64(seed0 ^ i as u64)).collect()
}

/// Observer for finished arena games.
pub trait GameSink {
    fn on_game(&mut self, game: u32, agent: &str, record: &GameRecord);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub games: u32,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (0 for fewer than two games).
    pub std_dev: f64,
    pub min: Reward,
    pub max: Reward,
}

impl Summary {
    /// # Panics
    /// Panics on an empty slice.
    pub fn from_scores(scores: &[Reward]) -> Self {
        assert!(!scores.is_empty(), "summary of zero games");
        let n = scores.len();
        let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / n as f64;

        let mut sorted = scores.to_vec();
        sorted.sort_unstable();
        let median = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
        };

        let std_dev = if n < 2 {
            0.0
        } else {
            let var = scores
                .iter()
                .map(|&s| {
                    let d = s as f64 - mean;
                    d * d
                })
                .sum::<f64>()
                / (n - 1) as f64;
            var.sqrt()
        };

        Self {
            games: n as u32,
            mean,
            median,
            std_dev,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArenaReport {
    pub seeds: Vec<u64>,
    pub scores: Vec<Reward>,
    pub summary: Summary,
}

/// Play `games` full games with `agent` and aggregate their scores.
pub fn run_arena<A: Agent + ?Sized>(
    agent: &mut A,
    games: u32,
    seed0: u64,
    mut sink: Option<&mut dyn GameSink>,
) -> Result<ArenaReport, EvalError> {
    if games == 0 {
        return Err(EvalError::InvalidConfig("arena.games must be > 0"));
    }
    let seeds = arena_seeds(seed0, games);
    let mut scores = Vec::with_capacity(games as usize);
    for (i, &seed) in seeds.iter().enumerate() {
        let record = play_game(agent, seed)?;
        info!(
            game = i,
            seed,
            agent = agent.name(),
            score = record.score,
            "game finished"
        );
        if let Some(s) = sink.as_deref_mut() {
            s.on_game(i as u32, agent.name(), &record);
        }
        scores.push(record.score);
    }
    let summary = Summary::from_scores(&scores);
    Ok(ArenaReport {
        seeds,
        scores,
        summary,
    })
}
