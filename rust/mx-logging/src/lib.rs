//! mx-logging: NDJSON events + tracing setup.
//!
//! Search and arena runs can append one JSON object per event to a file for later
//! post-mortems; human-readable diagnostics go through `tracing`.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

/// Install a stderr `fmt` subscriber. `RUST_LOG`, when set, overrides `level`.
pub fn init_tracing(level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()
}

/// One completed search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEventV1 {
    pub event: String,
    pub ts_ms: u64,

    pub board: [[u8; 5]; 5],
    pub committed: Option<u8>,
    pub variant: String,
    pub rollout: String,

    pub action: String,
    pub expected_reward: f64,
    pub simulations: u32,
    pub elapsed_ms: u64,
    pub nodes: usize,
}

/// One finished arena game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEventV1 {
    pub event: String,
    pub ts_ms: u64,

    pub game: u32,
    pub seed: u64,
    pub agent: String,
    pub score: u32,
    pub board: [[u8; 5]; 5],
}

#[derive(Debug, Error)]
pub enum NdjsonError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

impl Drop for NdjsonWriter {
    fn drop(&mut self) {
        let _ = self.w.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::Value;

    fn read_ndjson_lenient(path: &Path) -> Vec<Value> {
        let s = fs::read_to_string(path).expect("read");
        let mut out = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(v) = serde_json::from_str::<Value>(line) {
                out.push(v);
            }
        }
        out
    }

    fn game(n: u32, score: u32) -> GameEventV1 {
        GameEventV1 {
            event: "game".to_string(),
            ts_ms: now_ms(),
            game: n,
            seed: 100 + n as u64,
            agent: "random".to_string(),
            score,
            board: [[1; 5]; 5],
        }
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        w.write_event(&game(0, 120)).unwrap();
        w.write_event(&game(1, 340)).unwrap();
        w.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["event"], "game");
        assert_eq!(vals[0]["score"], 120);
        assert_eq!(vals[1]["game"], 1);
        assert_eq!(vals[1]["board"][4][4], 1);
    }

    #[test]
    fn reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&game(0, 1)).unwrap();
        }
        {
            let mut w = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();
            w.write_event(&game(1, 2)).unwrap();
            // Periodic flush makes the line visible before drop.
            assert_eq!(read_ndjson_lenient(&path).len(), 2);
        }
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&game(0, 10)).unwrap();
            w.flush().unwrap();
        }

        // Simulate crash: append a partial JSON line (no newline, invalid JSON).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"game","score":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["score"], 10);
    }

    #[test]
    fn search_event_roundtrips_through_json() {
        let e = SearchEventV1 {
            event: "search".to_string(),
            ts_ms: 1,
            board: [[0; 5]; 5],
            committed: Some(7),
            variant: "single_phase".to_string(),
            rollout: "random_fill".to_string(),
            action: "place (2, 2)".to_string(),
            expected_reward: 81.5,
            simulations: 1000,
            elapsed_ms: 12,
            nodes: 1001,
        };
        let s = serde_json::to_string(&e).unwrap();
        let back: SearchEventV1 = serde_json::from_str(&s).unwrap();
        assert_eq!(back.committed, Some(7));
        assert_eq!(back.action, "place (2, 2)");
        assert_eq!(back.nodes, 1001);
    }
}
