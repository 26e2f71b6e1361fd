//! Error types for the data-facing edges of the crate
//!
//! The simulation itself never fails: rejected actions are policy no-ops.
//! Only loading tuning files and leaderboard JSON can produce errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}

pub type Result<T> = std::result::Result<T, Error>;
