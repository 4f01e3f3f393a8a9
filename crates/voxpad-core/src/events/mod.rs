//! Canonical event union for all cross-adapter events.
//!
//! This module is the single source of truth for events delivered to UI
//! adapters (status bars, CLI progress lines, future GUI listeners).
//!
//! # Structure
//!
//! - `speech` - speech playback lifecycle and progress events
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag for frontend compatibility:
//!
//! ```json
//! { "type": "sentence_started", "index": 2, "total": 5 }
//! ```

mod speech;

use serde::{Deserialize, Serialize};

/// Canonical event types for all adapters.
///
/// Each variant includes all necessary context for the event to be
/// self-describing; receivers never need to query back for state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    // ========== Speech Events ==========
    /// A playback session has started and its sentence list is known.
    SpeechStarted {
        /// Number of sentences the session will speak.
        #[serde(rename = "sentenceCount")]
        sentence_count: usize,
    },

    /// The worker is about to vocalize one sentence.
    SentenceStarted {
        /// Zero-based index of the sentence being spoken.
        index: usize,
        /// Total sentences in the session.
        total: usize,
    },

    /// Playback was paused; the current sentence will be re-spoken on
    /// resume.
    SpeechPaused,

    /// Playback resumed from the paused sentence.
    SpeechResumed,

    /// Playback was stopped by an explicit command.
    SpeechStopped,

    /// The playback session ended and its state was cleared.
    SpeechFinished {
        /// `true` when every sentence was spoken; `false` when the
        /// session was cut short by a stop or an engine failure.
        completed: bool,
    },
}

impl AppEvent {
    /// Get the event name for wire protocols.
    ///
    /// This provides consistent event naming across transports.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::SpeechStarted { .. } => "speech:started",
            Self::SentenceStarted { .. } => "speech:sentence",
            Self::SpeechPaused => "speech:paused",
            Self::SpeechResumed => "speech:resumed",
            Self::SpeechStopped => "speech:stopped",
            Self::SpeechFinished { .. } => "speech:finished",
        }
    }
}
