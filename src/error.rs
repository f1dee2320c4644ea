//! Error types for the game core and its collaborators.
//!
//! The simulation step itself never fails; these cover configuration,
//! message loading and the scheduling/speech collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Message fetch failed: {0}")]
    Fetch(String),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Load ticket {ticket} is stale (current generation {current})")]
    StaleTicket { ticket: u64, current: u64 },

    #[error("Game core has been destroyed")]
    Destroyed,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid date key: {0}")]
    InvalidDate(String),

    #[error("No message scheduled for {0}")]
    NotFound(String),

    #[error("Version conflict for {date}: expected {expected:?}, found {found:?}")]
    Conflict {
        date: String,
        expected: Option<u64>,
        found: Option<u64>,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech generation failed for {word:?}: {reason}")]
    Generation { word: String, reason: String },
}
