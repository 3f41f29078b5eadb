//! YAML configuration for searches and arena runs.
//!
//! Every field has a default, so an empty document (or a missing section) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Which game model the tree is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Every edge places a card; below the root the card is drawn at expansion time.
    #[default]
    SinglePhase,
    /// Card-choice and position-choice nodes alternate.
    TwoPhase,
}

/// How a freshly expanded node is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutKind {
    /// One-shot random fill of every empty cell, then score.
    #[default]
    RandomFill,
    /// Step-by-step random playout through the phase state machine.
    Stepwise,
    /// Score of the partial board, without completing it.
    PartialScore,
}

/// Which agent plays arena games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    #[default]
    Mcts,
    Random,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::SinglePhase => "single_phase",
            Variant::TwoPhase => "two_phase",
        }
    }
}

impl RolloutKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RolloutKind::RandomFill => "random_fill",
            RolloutKind::Stepwise => "stepwise",
            RolloutKind::PartialScore => "partial_score",
        }
    }
}

impl AgentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Mcts => "mcts",
            AgentKind::Random => "random",
        }
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_phase" => Ok(Variant::SinglePhase),
            "two_phase" => Ok(Variant::TwoPhase),
            _ => Err(ConfigError::Invalid(
                "variant must be single_phase or two_phase",
            )),
        }
    }
}

impl FromStr for RolloutKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random_fill" => Ok(RolloutKind::RandomFill),
            "stepwise" => Ok(RolloutKind::Stepwise),
            "partial_score" => Ok(RolloutKind::PartialScore),
            _ => Err(ConfigError::Invalid(
                "rollout must be random_fill, stepwise or partial_score",
            )),
        }
    }
}

impl FromStr for AgentKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcts" => Ok(AgentKind::Mcts),
            "random" => Ok(AgentKind::Random),
            _ => Err(ConfigError::Invalid("agent must be mcts or random")),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Per-move search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// UCB1 exploration constant `C`. Zero disables the exploration bonus.
    #[serde(default = "default_exploration")]
    pub exploration: f64,
    /// Hard cap on completed rounds.
    #[serde(default = "default_max_simulations")]
    pub max_simulations: u32,
    /// Wall-clock budget in milliseconds (checked every 100 rounds).
    #[serde(default = "default_max_time_ms")]
    pub max_time_ms: u64,
    /// Seed for expansion shuffles and rollouts.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub rollout: RolloutKind,
}

fn default_exploration() -> f64 {
    std::f64::consts::FRAC_1_SQRT_2
}

fn default_max_simulations() -> u32 {
    100_000
}

fn default_max_time_ms() -> u64 {
    1_000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: default_exploration(),
            max_simulations: default_max_simulations(),
            max_time_ms: default_max_time_ms(),
            seed: 0,
            variant: Variant::default(),
            rollout: RolloutKind::default(),
        }
    }
}

/// Full-game evaluation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArenaConfig {
    #[serde(default = "default_arena_games")]
    pub games: u32,
    /// Base seed; per-game seeds are derived from it.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub agent: AgentKind,
}

fn default_arena_games() -> u32 {
    100
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            games: default_arena_games(),
            seed: 0,
            agent: AgentKind::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.search;
        if !(s.exploration.is_finite() && s.exploration >= 0.0) {
            return Err(ConfigError::Invalid(
                "search.exploration must be finite and >= 0",
            ));
        }
        if s.max_simulations == 0 {
            return Err(ConfigError::Invalid("search.max_simulations must be > 0"));
        }
        if self.arena.games == 0 {
            return Err(ConfigError::Invalid("arena.games must be > 0"));
        }
        Ok(())
    }
}
