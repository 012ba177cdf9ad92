//! High-score persistence.

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::warn;

use crate::ports::HighScoreStore;

/// Default location: `$HOME/.arcade_shooter_score`, or the working
/// directory when `HOME` is unset.
pub fn default_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".arcade_shooter_score")
}

/// The score as decimal text in a single file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|err| {
                warn!(path = %self.path.display(), %err, "unreadable high score, using 0");
                0
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => 0,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read high score");
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        if let Err(err) = std::fs::write(&self.path, score.to_string()) {
            warn!(path = %self.path.display(), %err, "failed to save high score");
        }
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    pub value: Option<u32>,
    /// Number of `save` calls seen.
    pub saves: usize,
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.value.unwrap_or(0)
    }

    fn save(&mut self, score: u32) {
        self.value = Some(score);
        self.saves += 1;
    }
}
