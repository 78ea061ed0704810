use std::path::PathBuf;

use crate::language::Difficulty;

/// Failures surfaced by the game core. None of these are fatal: callers log
/// them and degrade to a default.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("duration must be a whole number of seconds, got {0:?}")]
    InvalidDuration(String),

    #[error("duration must be greater than zero")]
    ZeroDuration,

    #[error("no session parameters to restart with")]
    NothingToRestart,

    #[error("could not read word bank {path}: {source}")]
    WordBankIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse word bank: {0}")]
    WordBankFormat(#[from] serde_json::Error),

    #[error("word bank has no words for {0}")]
    EmptyTier(Difficulty),
}

pub type Result<T> = std::result::Result<T, Error>;
