//! `SpeechService` — the adapter that implements `SpeechPlaybackPort`.
//!
//! This module is the single place where `voxpad-speech` native types are
//! converted to the transport-agnostic DTOs defined in `voxpad-core`.
//! Nothing outside this file should map [`SpeechError`] or [`Voice`] to
//! port types.
//!
//! When the engine probe fails at construction, the service keeps the
//! probe error and fails every command fast with `EngineUnavailable`
//! instead of attempting to speak.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use voxpad_core::events::AppEvent;
use voxpad_core::ports::speech::{
    PlaybackStatus, SpeechPlaybackPort, SpeechPortError, VoiceInfo,
};
use voxpad_core::ports::AppEventEmitter;
use voxpad_core::{RATE_MAX, RATE_MIN};

use crate::controller::{PlaybackController, PlaybackEvent, SessionSnapshot, StartKind};
use crate::engine::{EngineError, SpeechEngine, create_engine};
use crate::error::SpeechError;

// ── Service struct ─────────────────────────────────────────────────

/// Implements [`SpeechPlaybackPort`] by wrapping a [`PlaybackController`].
///
/// `controller` is `None` exactly when the engine probe failed; in that
/// mode every command returns the stored unavailability reason.
pub struct SpeechService {
    controller: Option<Arc<PlaybackController>>,
    unavailable: Option<String>,
}

impl SpeechService {
    /// Create a service over whatever speech backend `PATH` offers.
    ///
    /// Must be called inside a tokio runtime: the event bridge task is
    /// spawned here.
    #[must_use]
    pub fn new(emitter: Arc<dyn AppEventEmitter>) -> Self {
        Self::from_probe(create_engine(), emitter)
    }

    /// Create a service over an explicit engine (tests, embedding).
    #[must_use]
    pub fn with_engine(engine: Arc<dyn SpeechEngine>, emitter: Arc<dyn AppEventEmitter>) -> Self {
        Self::from_probe(Ok(engine), emitter)
    }

    /// Build the service from an engine probe result.
    ///
    /// A failed probe is reported once here; afterwards each command
    /// fails fast with the stored reason.
    #[must_use]
    pub fn from_probe(
        probe: Result<Arc<dyn SpeechEngine>, EngineError>,
        emitter: Arc<dyn AppEventEmitter>,
    ) -> Self {
        match probe {
            Ok(engine) => {
                let (controller, event_rx) = PlaybackController::new(engine);
                spawn_event_bridge(event_rx, emitter);
                Self {
                    controller: Some(Arc::new(controller)),
                    unavailable: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Speech engine unavailable; playback commands will fail fast");
                Self {
                    controller: None,
                    unavailable: Some(e.to_string()),
                }
            }
        }
    }

    /// Whether a speech engine was successfully initialised.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.controller.is_some()
    }

    /// A consistent snapshot of the live session, if the engine is
    /// available. Used by status displays that want sentence progress.
    #[must_use]
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        self.controller.as_ref().map(|c| c.snapshot())
    }

    fn controller(&self) -> Result<&Arc<PlaybackController>, SpeechPortError> {
        self.controller.as_ref().ok_or_else(|| {
            SpeechPortError::EngineUnavailable(
                self.unavailable
                    .clone()
                    .unwrap_or_else(|| "speech engine not initialised".to_string()),
            )
        })
    }

    /// Run a potentially blocking controller call off the async executor.
    async fn run_blocking<T, F>(&self, op: F) -> Result<T, SpeechPortError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<PlaybackController>) -> Result<T, SpeechError> + Send + 'static,
    {
        let controller = Arc::clone(self.controller()?);
        tokio::task::spawn_blocking(move || op(controller))
            .await
            .map_err(|e| SpeechPortError::Internal(e.to_string()))?
            .map_err(to_port_err)
    }
}

// ── Event bridge ───────────────────────────────────────────────────

/// Bridge [`PlaybackEvent`] → [`AppEvent`], forwarding each event to
/// `emitter`.
///
/// The spawned task self-terminates when the controller's sender is
/// dropped: `recv()` returns `None` and the loop exits.
pub fn spawn_event_bridge(
    mut event_rx: mpsc::UnboundedReceiver<PlaybackEvent>,
    emitter: Arc<dyn AppEventEmitter>,
) {
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            emitter.emit(match event {
                PlaybackEvent::Started { sentence_count } => {
                    AppEvent::speech_started(sentence_count)
                }
                PlaybackEvent::SentenceStarted { index, total } => {
                    AppEvent::sentence_started(index, total)
                }
                PlaybackEvent::Paused => AppEvent::speech_paused(),
                PlaybackEvent::Resumed => AppEvent::speech_resumed(),
                PlaybackEvent::Stopped => AppEvent::speech_stopped(),
                PlaybackEvent::Finished { completed } => AppEvent::speech_finished(completed),
            });
        }
    });
}

// ── Internal helpers ───────────────────────────────────────────────

/// Convert a [`SpeechError`] into its port equivalent.
///
/// This conversion lives here, in `voxpad-speech`, so that `voxpad-core`
/// never needs to import speech types. The dependency arrow stays
/// one-way.
fn to_port_err(e: SpeechError) -> SpeechPortError {
    match e {
        SpeechError::NothingToRead(message) => SpeechPortError::NothingToRead(message),
        SpeechError::InvalidRate(rate) => SpeechPortError::InvalidRate {
            rate,
            min: RATE_MIN,
            max: RATE_MAX,
        },
        SpeechError::UnknownVoice(voice) => SpeechPortError::UnknownVoice(voice),
        SpeechError::Engine(e) => SpeechPortError::Internal(e.to_string()),
        SpeechError::Worker(e) => SpeechPortError::Internal(e.to_string()),
    }
}

/// The user-visible state word for a status, used by logs and status
/// lines.
#[must_use]
pub const fn status_label(status: PlaybackStatus) -> &'static str {
    if !status.active {
        "idle"
    } else if status.paused {
        "paused"
    } else {
        "speaking"
    }
}

// ── SpeechPlaybackPort implementation ──────────────────────────────

#[async_trait]
impl SpeechPlaybackPort for SpeechService {
    async fn start_all(&self, text: &str) -> Result<(), SpeechPortError> {
        let text = text.to_string();
        // spawn_blocking: start drains the previous worker, which can
        // block for up to one utterance.
        self.run_blocking(move |c| c.start(&text, StartKind::All))
            .await
    }

    async fn start_selection(&self, text: &str) -> Result<(), SpeechPortError> {
        let text = text.to_string();
        self.run_blocking(move |c| c.start(&text, StartKind::Selection))
            .await
    }

    async fn pause(&self) -> Result<(), SpeechPortError> {
        self.controller()?.pause();
        Ok(())
    }

    async fn resume(&self) -> Result<(), SpeechPortError> {
        self.controller()?.resume();
        Ok(())
    }

    async fn stop(&self) -> Result<(), SpeechPortError> {
        self.controller()?.stop();
        Ok(())
    }

    async fn set_rate(&self, rate: u32) -> Result<(), SpeechPortError> {
        self.controller()?.set_rate(rate).map_err(to_port_err)
    }

    async fn set_voice(&self, voice_id: &str) -> Result<(), SpeechPortError> {
        let voice_id = voice_id.to_string();
        // spawn_blocking: voice validation shells out to the engine's
        // voice listing.
        self.run_blocking(move |c| c.set_voice(&voice_id)).await
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechPortError> {
        let voices = self.run_blocking(|c| c.list_voices()).await?;
        Ok(voices
            .into_iter()
            .map(|v| VoiceInfo::new(v.id, v.name))
            .collect())
    }

    async fn status(&self) -> PlaybackStatus {
        self.controller
            .as_ref()
            .map_or_else(PlaybackStatus::default, |c| c.status())
    }
}
