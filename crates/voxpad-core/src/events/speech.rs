//! Speech playback events (session lifecycle and progress).

use super::AppEvent;

impl AppEvent {
    /// Create a session-started event.
    pub const fn speech_started(sentence_count: usize) -> Self {
        Self::SpeechStarted { sentence_count }
    }

    /// Create a sentence-progress event.
    pub const fn sentence_started(index: usize, total: usize) -> Self {
        Self::SentenceStarted { index, total }
    }

    /// Create a paused event.
    pub const fn speech_paused() -> Self {
        Self::SpeechPaused
    }

    /// Create a resumed event.
    pub const fn speech_resumed() -> Self {
        Self::SpeechResumed
    }

    /// Create a stopped event.
    pub const fn speech_stopped() -> Self {
        Self::SpeechStopped
    }

    /// Create a session-finished event.
    pub const fn speech_finished(completed: bool) -> Self {
        Self::SpeechFinished { completed }
    }
}
