//! Speech playback port — trait abstraction for playback commands & status.
//!
//! # Design Rules
//!
//! - DTOs here are transport-agnostic wire shapes (no `voxpad-speech` types).
//!   Conversion from native controller types happens inside `voxpad-speech`,
//!   never here, so this crate stays free of engine dependencies.
//! - `SpeechPlaybackPort` is the only surface a front-end needs in order to
//!   drive playback and render its controls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// Current playback status.
///
/// `paused` is only ever `true` while `active` is `true`; an idle
/// controller reports both flags off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    /// Whether a playback session is live (speaking or paused).
    pub active: bool,
    /// Whether the live session is paused.
    pub paused: bool,
}

impl PlaybackStatus {
    /// Whether an utterance may currently be in flight.
    #[must_use]
    pub const fn is_speaking(&self) -> bool {
        self.active && !self.paused
    }
}

/// Enablement of the playback affordances and settings controls derived
/// from a [`PlaybackStatus`].
///
/// Front-ends apply these directly to their buttons/inputs instead of
/// re-deriving the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlStates {
    /// Read-all / read-selection entry points.
    pub read_enabled: bool,
    /// The pause control.
    pub pause_enabled: bool,
    /// The resume control.
    pub resume_enabled: bool,
    /// The stop control.
    pub stop_enabled: bool,
    /// The rate and voice settings controls.
    pub settings_enabled: bool,
}

impl ControlStates {
    /// Derive control enablement from a playback status.
    ///
    /// Reading and settings are available whenever no utterance can be in
    /// flight; pause only while speaking; resume only while paused; stop
    /// whenever a session is live.
    #[must_use]
    pub const fn from_status(status: PlaybackStatus) -> Self {
        let speaking = status.is_speaking();
        Self {
            read_enabled: !speaking,
            pause_enabled: speaking,
            resume_enabled: status.active && status.paused,
            stop_enabled: status.active,
            settings_enabled: !speaking,
        }
    }
}

/// Information about a single speech voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInfo {
    /// Voice identifier used in commands (engine id or the default
    /// sentinel).
    pub id: String,
    /// Human-readable display name.
    pub name: String,
}

impl VoiceInfo {
    /// Create a voice entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// Errors returned by `SpeechPlaybackPort` operations.
///
/// Front-ends map these to status messages; none of them indicates a
/// corrupted session (the controller never leaves its invariants behind).
#[derive(Debug, Error)]
pub enum SpeechPortError {
    /// The speech engine failed to initialise; every command reports this
    /// until the process is restarted with a working engine.
    #[error("TTS unavailable: {0}")]
    EngineUnavailable(String),

    /// Start was called with empty or whitespace-only text.
    #[error("{0}")]
    NothingToRead(String),

    /// A rate outside the supported words-per-minute range was rejected.
    #[error("Unsupported rate {rate} wpm (supported: {min}-{max})")]
    InvalidRate {
        /// The rejected rate.
        rate: u32,
        /// Lower bound of the supported range.
        min: u32,
        /// Upper bound of the supported range.
        max: u32,
    },

    /// A voice id that the engine does not offer was rejected.
    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    /// Unexpected internal error.
    #[error("Internal speech error: {0}")]
    Internal(String),
}

// ── Port trait ────────────────────────────────────────────────────────────────

/// Port trait for speech playback commands.
///
/// Implemented by `SpeechService` in `voxpad-speech`. Consumed by the CLI
/// front-end and by any future GUI adapter.
///
/// All commands return quickly; the only one that may block briefly is a
/// start, which synchronously drains the previous session's worker before
/// installing the new one.
#[async_trait]
pub trait SpeechPlaybackPort: Send + Sync {
    /// Start reading the full document text from the beginning.
    async fn start_all(&self, text: &str) -> Result<(), SpeechPortError>;

    /// Start reading a selection from the beginning.
    async fn start_selection(&self, text: &str) -> Result<(), SpeechPortError>;

    /// Pause the live session at the current sentence. No-op when idle.
    async fn pause(&self) -> Result<(), SpeechPortError>;

    /// Resume a paused session from the sentence it paused on. No-op when
    /// not paused.
    async fn resume(&self) -> Result<(), SpeechPortError>;

    /// Stop the live session and clear its state. No-op when idle.
    async fn stop(&self) -> Result<(), SpeechPortError>;

    /// Set the speaking rate in words per minute.
    ///
    /// Stored immediately; applied to the engine only while no utterance
    /// can be in flight, otherwise it becomes audible at the next session.
    async fn set_rate(&self, rate: u32) -> Result<(), SpeechPortError>;

    /// Select a voice by id (the default sentinel selects the engine's
    /// own default voice). Same application timing as [`Self::set_rate`].
    async fn set_voice(&self, voice_id: &str) -> Result<(), SpeechPortError>;

    /// List selectable voices, the default sentinel entry first.
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechPortError>;

    /// Return the current playback status.
    async fn status(&self) -> PlaybackStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_status_enables_read_and_settings_only() {
        let controls = ControlStates::from_status(PlaybackStatus::default());
        assert!(controls.read_enabled);
        assert!(!controls.pause_enabled);
        assert!(!controls.resume_enabled);
        assert!(!controls.stop_enabled);
        assert!(controls.settings_enabled);
    }

    #[test]
    fn speaking_status_enables_pause_and_stop_only() {
        let status = PlaybackStatus {
            active: true,
            paused: false,
        };
        assert!(status.is_speaking());

        let controls = ControlStates::from_status(status);
        assert!(!controls.read_enabled);
        assert!(controls.pause_enabled);
        assert!(!controls.resume_enabled);
        assert!(controls.stop_enabled);
        assert!(!controls.settings_enabled);
    }

    #[test]
    fn paused_status_reopens_read_and_settings() {
        let status = PlaybackStatus {
            active: true,
            paused: true,
        };
        assert!(!status.is_speaking());

        let controls = ControlStates::from_status(status);
        assert!(controls.read_enabled);
        assert!(!controls.pause_enabled);
        assert!(controls.resume_enabled);
        assert!(controls.stop_enabled);
        assert!(controls.settings_enabled);
    }

    #[test]
    fn status_serializes_camel_case() {
        let status = PlaybackStatus {
            active: true,
            paused: false,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"active":true,"paused":false}"#);

        let controls = ControlStates::from_status(status);
        let json = serde_json::to_string(&controls).unwrap();
        assert!(json.contains("\"readEnabled\":false"));
        assert!(json.contains("\"settingsEnabled\":false"));
    }

    #[test]
    fn port_error_messages_are_user_facing() {
        let err = SpeechPortError::EngineUnavailable("no engine found".to_string());
        assert_eq!(err.to_string(), "TTS unavailable: no engine found");

        let err = SpeechPortError::InvalidRate {
            rate: 500,
            min: 90,
            max: 280,
        };
        assert_eq!(err.to_string(), "Unsupported rate 500 wpm (supported: 90-280)");
    }

    /// The port must stay object-safe: adapters hold it as
    /// `Arc<dyn SpeechPlaybackPort>`.
    #[tokio::test]
    async fn port_is_usable_as_trait_object() {
        struct StubPort;

        #[async_trait]
        impl SpeechPlaybackPort for StubPort {
            async fn start_all(&self, text: &str) -> Result<(), SpeechPortError> {
                if text.trim().is_empty() {
                    return Err(SpeechPortError::NothingToRead("no text to read".into()));
                }
                Ok(())
            }

            async fn start_selection(&self, text: &str) -> Result<(), SpeechPortError> {
                self.start_all(text).await
            }

            async fn pause(&self) -> Result<(), SpeechPortError> {
                Ok(())
            }

            async fn resume(&self) -> Result<(), SpeechPortError> {
                Ok(())
            }

            async fn stop(&self) -> Result<(), SpeechPortError> {
                Ok(())
            }

            async fn set_rate(&self, _rate: u32) -> Result<(), SpeechPortError> {
                Ok(())
            }

            async fn set_voice(&self, _voice_id: &str) -> Result<(), SpeechPortError> {
                Ok(())
            }

            async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechPortError> {
                Ok(vec![VoiceInfo::new("default", "(default)")])
            }

            async fn status(&self) -> PlaybackStatus {
                PlaybackStatus::default()
            }
        }

        let port: std::sync::Arc<dyn SpeechPlaybackPort> = std::sync::Arc::new(StubPort);
        assert!(port.start_all("Hello.").await.is_ok());
        assert!(matches!(
            port.start_all("   ").await,
            Err(SpeechPortError::NothingToRead(_))
        ));
        assert_eq!(port.status().await, PlaybackStatus::default());
        assert_eq!(port.list_voices().await.unwrap().len(), 1);
    }
}
