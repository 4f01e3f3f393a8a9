//! Speech playback error types.

use voxpad_core::{RATE_MAX, RATE_MIN};

use crate::engine::EngineError;

/// Errors returned by playback controller operations.
///
/// Pause, resume, stop and status are total; only the operations that
/// validate input or touch the engine can fail.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// Start was called with empty or whitespace-only text. The message
    /// distinguishes the read-all and read-selection entry points.
    #[error("{0}")]
    NothingToRead(String),

    /// A rate outside the supported words-per-minute range.
    #[error("rate {0} wpm is outside the supported range {RATE_MIN}-{RATE_MAX}")]
    InvalidRate(u32),

    /// A voice id the engine does not offer.
    #[error("unknown voice: {0}")]
    UnknownVoice(String),

    /// A failure at the engine boundary.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The playback worker thread could not be spawned.
    #[error("failed to spawn playback worker: {0}")]
    Worker(#[from] std::io::Error),
}
