//! Referee error types

use renju_core::history::HistoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefereeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid board size {rows}x{cols}")]
    InvalidBoard { rows: usize, cols: usize },

    #[error("Invalid winning length {0}")]
    InvalidToWin(usize),

    #[error("Move ({row}, {col}) is off the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("Move history repeats cell ({row}, {col}) at ply {ply}")]
    DuplicateMove { row: usize, col: usize, ply: usize },

    #[error("Game is already decided")]
    GameOver,

    #[error("Move history error: {0}")]
    History(#[from] HistoryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Worker pool closed: {0}")]
    Pool(#[from] tokio::sync::AcquireError),
}
