//! mx: CLI binary for the Mathematico MCTS engine.
//!
//! Subcommands:
//! - score
//! - search
//! - arena

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mx_core::{
    find_deck, line_scores, score_board, AgentKind, Board, Card, Config, RolloutKind, Variant,
    BOARD_SIZE, CELLS,
};
use mx_eval::{agent_for, run_arena, GameRecord, GameSink};
use mx_logging::{init_tracing, now_ms, GameEventV1, NdjsonError, NdjsonWriter, SearchEventV1};

#[derive(Parser, Debug)]
#[command(name = "mx", version, about = "Mathematico move search")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the per-line breakdown and total score of a board
    Score {
        /// 25 comma-separated values, rows optionally separated by `/`
        #[arg(long)]
        board: String,
    },
    /// Recommend a move for one position
    Search {
        #[arg(long)]
        board: String,
        /// Card already drawn (required by the single-phase model)
        #[arg(long)]
        card: Option<Card>,
        /// single_phase | two_phase
        #[arg(long)]
        variant: Option<Variant>,
        /// random_fill | stepwise | partial_score
        #[arg(long)]
        rollout: Option<RolloutKind>,
        #[arg(long)]
        exploration: Option<f64>,
        #[arg(long)]
        simulations: Option<u32>,
        #[arg(long)]
        time_ms: Option<u64>,
        #[arg(long)]
        seed: Option<u64>,
        /// YAML config; flags take precedence
        #[arg(long)]
        config: Option<PathBuf>,
        /// Append an NDJSON search event to this file
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Play full games and print score statistics
    Arena {
        #[arg(long)]
        games: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// mcts | random
        #[arg(long)]
        agent: Option<AgentKind>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Append one NDJSON event per game to this file
        #[arg(long)]
        events: Option<PathBuf>,
    },
}

/// Parse 25 cell values. Commas separate cells; `/` may separate rows.
fn parse_board(s: &str) -> Result<Board> {
    let values: Vec<&str> = s
        .split(|c: char| c == ',' || c == '/')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if values.len() != CELLS {
        bail!("board needs {} values, got {}", CELLS, values.len());
    }
    let mut board = [[0; BOARD_SIZE]; BOARD_SIZE];
    for (i, v) in values.iter().enumerate() {
        board[i / BOARD_SIZE][i % BOARD_SIZE] = v
            .parse()
            .with_context(|| format!("invalid cell value {:?}", v))?;
    }
    find_deck(&board).map_err(|e| anyhow!("invalid board: {}", e))?;
    Ok(board)
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(Config::default()),
    }
}

fn print_board(board: &Board) {
    for row in board {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>3}", v)).collect();
        println!("  {}", cells.join(""));
    }
}

fn cmd_score(board: &str) -> Result<()> {
    let board = parse_board(board)?;
    let scores = line_scores(&board);
    print_board(&board);
    println!();
    println!("Rows:      {:?}", &scores[0..BOARD_SIZE]);
    println!("Columns:   {:?}", &scores[BOARD_SIZE..2 * BOARD_SIZE]);
    println!("Diagonals: {:?}", &scores[2 * BOARD_SIZE..]);
    println!("Total: {}", score_board(&board));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_search(
    board: &str,
    card: Option<Card>,
    variant: Option<Variant>,
    rollout: Option<RolloutKind>,
    exploration: Option<f64>,
    simulations: Option<u32>,
    time_ms: Option<u64>,
    seed: Option<u64>,
    config: Option<&Path>,
    events: Option<&Path>,
) -> Result<()> {
    let board = parse_board(board)?;
    let mut cfg = load_config(config)?;
    let s = &mut cfg.search;
    if let Some(v) = variant {
        s.variant = v;
    }
    if let Some(r) = rollout {
        s.rollout = r;
    }
    if let Some(x) = exploration {
        s.exploration = x;
    }
    if let Some(n) = simulations {
        s.max_simulations = n;
    }
    if let Some(t) = time_ms {
        s.max_time_ms = t;
    }
    if let Some(x) = seed {
        s.seed = x;
    }
    cfg.validate()?;

    let res = mx_mcts::search(&board, card, &cfg.search)?;

    println!("Search:");
    println!("  - Action: {}", res.action);
    println!("  - Expected reward: {:.2}", res.expected_reward);
    println!("  - Simulations: {}", res.simulations);
    println!("  - Elapsed: {} ms", res.elapsed_ms());
    println!("  - Nodes: {}", res.stats.node_count);

    if let Some(path) = events {
        let mut w = NdjsonWriter::open_append(path)?;
        w.write_event(&SearchEventV1 {
            event: "search".to_string(),
            ts_ms: now_ms(),
            board,
            committed: card,
            variant: cfg.search.variant.as_str().to_string(),
            rollout: cfg.search.rollout.as_str().to_string(),
            action: res.action.to_string(),
            expected_reward: res.expected_reward,
            simulations: res.simulations,
            elapsed_ms: res.elapsed_ms(),
            nodes: res.stats.node_count,
        })?;
        w.flush()?;
    }
    Ok(())
}

/// Writes one `GameEventV1` per finished game; keeps the first write error.
struct EventSink {
    w: NdjsonWriter,
    err: Option<NdjsonError>,
}

impl GameSink for EventSink {
    fn on_game(&mut self, game: u32, agent: &str, record: &GameRecord) {
        if self.err.is_some() {
            return;
        }
        let ev = GameEventV1 {
            event: "game".to_string(),
            ts_ms: now_ms(),
            game,
            seed: record.seed,
            agent: agent.to_string(),
            score: record.score,
            board: record.board,
        };
        if let Err(e) = self.w.write_event(&ev) {
            self.err = Some(e);
        }
    }
}

fn cmd_arena(
    games: Option<u32>,
    seed: Option<u64>,
    agent: Option<AgentKind>,
    config: Option<&Path>,
    events: Option<&Path>,
) -> Result<()> {
    let mut cfg = load_config(config)?;
    if let Some(g) = games {
        cfg.arena.games = g;
    }
    if let Some(s) = seed {
        cfg.arena.seed = s;
    }
    if let Some(a) = agent {
        cfg.arena.agent = a;
    }
    cfg.validate()?;

    let mut player = agent_for(cfg.arena.agent, &cfg.search, cfg.arena.seed);
    info!(
        agent = player.name(),
        games = cfg.arena.games,
        seed = cfg.arena.seed,
        "arena starting"
    );

    let mut sink = match events {
        Some(path) => Some(EventSink {
            w: NdjsonWriter::open_append(path)?,
            err: None,
        }),
        None => None,
    };
    let report = run_arena(
        player.as_mut(),
        cfg.arena.games,
        cfg.arena.seed,
        sink.as_mut().map(|s| s as &mut dyn GameSink),
    )?;
    if let Some(mut s) = sink {
        if let Some(e) = s.err.take() {
            return Err(e.into());
        }
        s.w.flush()?;
    }

    let s = report.summary;
    println!("Evaluation:");
    println!("  - Agent: {}", cfg.arena.agent.as_str());
    println!("  - Games: {}", s.games);
    println!(
        "  - Score: mean={:.2}, median={}, std={:.2}, min={}, max={}",
        s.mean, s.median, s.std_dev, s.min, s.max
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level).map_err(|e| anyhow!("tracing init failed: {}", e))?;

    match cli.command {
        Command::Score { board } => cmd_score(&board),
        Command::Search {
            board,
            card,
            variant,
            rollout,
            exploration,
            simulations,
            time_ms,
            seed,
            config,
            events,
        } => cmd_search(
            &board,
            card,
            variant,
            rollout,
            exploration,
            simulations,
            time_ms,
            seed,
            config.as_deref(),
            events.as_deref(),
        ),
        Command::Arena {
            games,
            seed,
            agent,
            config,
            events,
        } => cmd_arena(games, seed, agent, config.as_deref(), events.as_deref()),
    }
}
