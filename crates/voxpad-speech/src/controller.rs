//! Playback controller — the start/pause/resume/stop state machine.
//!
//! ```text
//!   Idle ──start──▶ Speaking ──pause──▶ Paused
//!    ▲                 │  ▲               │
//!    │                 │  └───resume──────┘
//!    └──stop/finish────┘
//! ```
//!
//! One background worker thread per session speaks one sentence per
//! blocking engine call and re-checks the shared session under its lock
//! between utterances. Pausing and stopping interrupt the utterance in
//! flight, so their worst-case latency is bounded by one sentence's
//! duration plus the pause poll interval. A paused sentence is re-spoken
//! from the same index on resume, never skipped.
//!
//! Commands never block, with one exception: `start` synchronously drains
//! the previous session's worker before installing the new one, which
//! guarantees at most one worker is ever live.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use voxpad_core::{
    DEFAULT_VOICE_ID, DEFAULT_VOICE_NAME, PlaybackStatus, SettingsError, SpeechSettings,
    validate_rate,
};

use crate::engine::{SpeechEngine, Voice};
use crate::error::SpeechError;
use crate::segment::split_sentences;
use crate::session::PlaybackSession;

/// How long the worker idles between pause checks. Polling keeps the
/// worker observable to resume/stop without condition-variable plumbing.
pub const PAUSE_POLL: Duration = Duration::from_millis(80);

// ── Events ─────────────────────────────────────────────────────────

/// Events emitted by the controller to the UI / application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A session's sentence list is known and playback is beginning.
    Started {
        /// Number of sentences the session will speak.
        sentence_count: usize,
    },

    /// The worker is about to vocalize one sentence.
    SentenceStarted {
        /// Zero-based sentence index.
        index: usize,
        /// Total sentences in the session.
        total: usize,
    },

    /// Playback paused at the current sentence.
    Paused,

    /// Playback resumed from the paused sentence.
    Resumed,

    /// Playback stopped by an explicit command (or superseded by a new
    /// start).
    Stopped,

    /// The session ended and its state was cleared.
    Finished {
        /// `true` when every sentence was spoken, `false` when the
        /// session was cut short by an engine failure.
        completed: bool,
    },
}

// ── Start variants ─────────────────────────────────────────────────

/// Which entry point initiated a session. The two variants share all
/// start semantics and differ only in reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartKind {
    /// Read the full document text.
    All,
    /// Read the current selection.
    Selection,
}

impl StartKind {
    /// The message reported when the text turns out to be empty.
    #[must_use]
    pub const fn nothing_to_read_message(self) -> &'static str {
        match self {
            Self::All => "No text to read",
            Self::Selection => "No selection to read",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Selection => "selection",
        }
    }
}

// ── Snapshot ───────────────────────────────────────────────────────

/// A consistent copy of the session's observable state, read under the
/// session lock in one acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Whether a session is live.
    pub active: bool,
    /// Whether the live session is paused.
    pub paused: bool,
    /// Index of the next sentence to speak.
    pub current_index: usize,
    /// Sentence count, once the worker has computed it.
    pub sentence_count: usize,
}

// ── Shared state ───────────────────────────────────────────────────

/// State shared between command handlers and the worker thread.
struct Shared {
    session: Mutex<PlaybackSession>,
    settings: Mutex<SpeechSettings>,
    engine: Arc<dyn SpeechEngine>,
    event_tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl Shared {
    fn lock_session(&self) -> MutexGuard<'_, PlaybackSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_settings(&self) -> MutexGuard<'_, SpeechSettings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Best-effort event emission — a dropped receiver is logged, never
    /// an error.
    fn emit(&self, event: PlaybackEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("Playback event receiver dropped");
        }
    }
}

// ── Controller ─────────────────────────────────────────────────────

/// The playback controller.
///
/// Owns the single [`PlaybackSession`] and the speech engine handle. All
/// methods take `&self`; the service layer holds the controller in an
/// `Arc` and calls it from async context via `spawn_blocking` where a
/// call may block.
pub struct PlaybackController {
    shared: Arc<Shared>,

    /// Join handle of the live worker, drained by the next `start` (or
    /// on drop).
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl PlaybackController {
    /// Create a controller around an engine.
    ///
    /// Returns the controller and the receiver for [`PlaybackEvent`]s.
    #[must_use]
    pub fn new(engine: Arc<dyn SpeechEngine>) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let controller = Self {
            shared: Arc::new(Shared {
                session: Mutex::new(PlaybackSession::default()),
                settings: Mutex::new(SpeechSettings::default()),
                engine,
                event_tx,
            }),
            worker: Mutex::new(None),
        };
        (controller, event_rx)
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Start reading `text` from the beginning, superseding any live
    /// session.
    ///
    /// The previous worker is stopped and joined before any new state is
    /// installed, so no sentence of the old text can be spoken after this
    /// returns. Trimmed-empty text aborts with
    /// [`SpeechError::NothingToRead`] and no state change.
    pub fn start(&self, text: &str, kind: StartKind) -> Result<(), SpeechError> {
        self.stop_and_drain();

        if text.trim().is_empty() {
            return Err(SpeechError::NothingToRead(
                kind.nothing_to_read_message().to_string(),
            ));
        }

        let epoch = {
            let mut session = self.shared.lock_session();
            session.install(text.to_string());
            session.epoch
        };

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("voxpad-speech".into())
            .spawn(move || worker_loop(&shared, epoch));

        match spawned {
            Ok(handle) => {
                *self
                    .worker
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(handle);
                info!(kind = kind.label(), chars = text.len(), "Playback session started");
                Ok(())
            }
            Err(e) => {
                // Leave no half-installed session behind.
                self.shared.lock_session().clear();
                Err(SpeechError::Worker(e))
            }
        }
    }

    /// Pause the live session at its current sentence. The in-flight
    /// utterance is interrupted and will be re-spoken on resume. No-op
    /// when idle or already paused.
    pub fn pause(&self) {
        let did_pause = {
            let mut session = self.shared.lock_session();
            if session.active && !session.paused {
                session.paused = true;
                true
            } else {
                false
            }
        };

        if did_pause {
            self.shared.engine.interrupt();
            self.shared.emit(PlaybackEvent::Paused);
            info!("Playback paused");
        }
    }

    /// Resume a paused session from the sentence it paused on. No-op
    /// when not paused.
    pub fn resume(&self) {
        let did_resume = {
            let mut session = self.shared.lock_session();
            if session.active && session.paused {
                session.paused = false;
                true
            } else {
                false
            }
        };

        if did_resume {
            self.shared.emit(PlaybackEvent::Resumed);
            info!("Playback resumed");
        }
    }

    /// Stop the live session and clear its state. Synchronous with
    /// respect to state visibility; the worker exits on its own once its
    /// current utterance is interrupted. No-op when idle.
    pub fn stop(&self) {
        let was_active = {
            let mut session = self.shared.lock_session();
            if session.active {
                session.clear();
                true
            } else {
                false
            }
        };

        if was_active {
            self.shared.engine.interrupt();
            self.shared.emit(PlaybackEvent::Stopped);
            info!("Playback stopped");
        }
    }

    // ── Settings ───────────────────────────────────────────────────

    /// Set the speaking rate in words per minute.
    ///
    /// The stored value always updates; the engine is only touched while
    /// no utterance can be in flight, otherwise the change becomes
    /// audible at the next session (the worker re-applies stored
    /// settings at session start).
    pub fn set_rate(&self, rate: u32) -> Result<(), SpeechError> {
        validate_rate(rate).map_err(|e| match e {
            SettingsError::InvalidRate(r) => SpeechError::InvalidRate(r),
            SettingsError::EmptyVoice => SpeechError::InvalidRate(rate),
        })?;

        self.shared.lock_settings().rate = rate;

        if self.status().is_speaking() {
            debug!(rate, "Rate change deferred while speaking");
        } else {
            self.shared.engine.set_rate(rate);
        }
        Ok(())
    }

    /// Select a voice by id. The default sentinel selects the engine's
    /// own default voice; any other id must appear in the engine's voice
    /// list. Same application timing as [`Self::set_rate`].
    pub fn set_voice(&self, voice_id: &str) -> Result<(), SpeechError> {
        let voice_id = voice_id.trim();
        if voice_id.is_empty() {
            return Err(SpeechError::UnknownVoice(voice_id.to_string()));
        }

        if voice_id != DEFAULT_VOICE_ID
            && !self
                .shared
                .engine
                .list_voices()?
                .iter()
                .any(|v| v.id == voice_id)
        {
            return Err(SpeechError::UnknownVoice(voice_id.to_string()));
        }

        self.shared.lock_settings().voice = voice_id.to_string();

        if self.status().is_speaking() {
            debug!(voice = voice_id, "Voice change deferred while speaking");
        } else {
            let settings = self.shared.lock_settings().clone();
            self.shared.engine.set_voice(settings.explicit_voice());
        }
        Ok(())
    }

    /// List selectable voices with the default sentinel entry first.
    pub fn list_voices(&self) -> Result<Vec<Voice>, SpeechError> {
        let mut voices = vec![Voice {
            id: DEFAULT_VOICE_ID.to_string(),
            name: DEFAULT_VOICE_NAME.to_string(),
        }];
        voices.extend(self.shared.engine.list_voices()?);
        Ok(voices)
    }

    // ── Queries ────────────────────────────────────────────────────

    /// The current playback status flags.
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.shared.lock_session().status()
    }

    /// A consistent snapshot of the session, for status displays and
    /// invariant checks.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.shared.lock_session();
        SessionSnapshot {
            active: session.active,
            paused: session.paused,
            current_index: session.current_index,
            sentence_count: session.sentences.len(),
        }
    }

    /// The stored speech settings.
    #[must_use]
    pub fn settings(&self) -> SpeechSettings {
        self.shared.lock_settings().clone()
    }

    /// The backend name of the underlying engine.
    #[must_use]
    pub fn engine_name(&self) -> &'static str {
        self.shared.engine.name()
    }

    // ── Internal ───────────────────────────────────────────────────

    /// Stop the live session and join its worker. Called by `start` (and
    /// drop) to guarantee at most one worker is ever live.
    fn stop_and_drain(&self) {
        self.stop();
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("Playback worker panicked");
            }
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.stop_and_drain();
    }
}

// ── Worker ─────────────────────────────────────────────────────────

/// What the worker decided to do after one look at the session.
enum Step {
    /// Paused — idle briefly and look again.
    Wait,
    /// Speak this sentence.
    Speak(usize, String),
}

/// The per-session worker body.
///
/// `epoch` identifies the session this worker belongs to; every touch of
/// shared state is guarded by [`PlaybackSession::is_live`], so a stop or
/// a superseding start that races an in-flight utterance can never
/// resurrect cleared state or over-advance the index.
fn worker_loop(shared: &Shared, epoch: u64) {
    // Re-apply stored settings so a change deferred while the previous
    // session was speaking becomes audible now.
    {
        let settings = shared.lock_settings().clone();
        shared.engine.set_rate(settings.rate);
        shared.engine.set_voice(settings.explicit_voice());
    }

    let total = {
        let mut session = shared.lock_session();
        if !session.is_live(epoch) {
            return;
        }
        if session.sentences.is_empty() {
            session.sentences = split_sentences(&session.source_text);
        }
        session.sentences.len()
    };
    shared.emit(PlaybackEvent::Started {
        sentence_count: total,
    });
    debug!(sentences = total, "Playback worker running");

    // None: stopped or superseded — the command handler already cleared
    // and notified. Some(completed): this worker owns the cleanup.
    let outcome: Option<bool> = loop {
        let step = {
            let session = shared.lock_session();
            if !session.is_live(epoch) {
                break None;
            }
            if session.paused {
                Step::Wait
            } else if session.current_index >= session.sentences.len() {
                break Some(true);
            } else {
                Step::Speak(
                    session.current_index,
                    session.sentences[session.current_index].clone(),
                )
            }
        };

        match step {
            Step::Wait => thread::sleep(PAUSE_POLL),
            Step::Speak(index, sentence) => {
                shared.emit(PlaybackEvent::SentenceStarted { index, total });
                debug!(index, total, "Speaking sentence");

                if let Err(e) = shared.engine.speak(&sentence) {
                    warn!(error = %e, "Engine failed to speak; ending session");
                    break Some(false);
                }

                // Advance only if this session is still live and was not
                // paused mid-utterance: the pause guard implements
                // re-speak-on-resume, the liveness guard makes a racing
                // stop safe.
                let mut session = shared.lock_session();
                if session.is_live(epoch) && !session.paused {
                    session.current_index += 1;
                }
            }
        }
    };

    if let Some(completed) = outcome {
        let cleared = {
            let mut session = shared.lock_session();
            if session.is_live(epoch) {
                session.clear();
                true
            } else {
                false
            }
        };
        if cleared {
            shared.emit(PlaybackEvent::Finished { completed });
            info!(completed, "Playback session finished");
        }
    }
    debug!("Playback worker exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineError;

    /// Engine whose utterances complete instantly.
    struct NullEngine;

    impl SpeechEngine for NullEngine {
        fn speak(&self, _text: &str) -> Result<(), EngineError> {
            Ok(())
        }
        fn interrupt(&self) {}
        fn set_rate(&self, _wpm: u32) {}
        fn set_voice(&self, _voice_id: Option<&str>) {}
        fn list_voices(&self) -> Result<Vec<Voice>, EngineError> {
            Ok(vec![Voice {
                id: "en-us".to_string(),
                name: "English (America)".to_string(),
            }])
        }
        fn name(&self) -> &'static str {
            "null"
        }
    }

    fn controller() -> (
        PlaybackController,
        mpsc::UnboundedReceiver<PlaybackEvent>,
    ) {
        PlaybackController::new(Arc::new(NullEngine))
    }

    #[test]
    fn controller_starts_idle() {
        let (controller, _rx) = controller();
        let status = controller.status();
        assert!(!status.active);
        assert!(!status.paused);
        assert_eq!(controller.snapshot().current_index, 0);
    }

    #[test]
    fn start_rejects_empty_text_without_state_change() {
        let (controller, _rx) = controller();
        for text in ["", "   ", "\n\t "] {
            let err = controller.start(text, StartKind::All).unwrap_err();
            assert!(matches!(err, SpeechError::NothingToRead(_)));
            assert!(!controller.status().active);
        }
    }

    #[test]
    fn nothing_to_read_message_differs_per_entry_point() {
        let (controller, _rx) = controller();
        let all = controller.start("  ", StartKind::All).unwrap_err();
        let selection = controller.start("  ", StartKind::Selection).unwrap_err();
        assert_eq!(all.to_string(), "No text to read");
        assert_eq!(selection.to_string(), "No selection to read");
    }

    #[test]
    fn pause_resume_stop_are_no_ops_when_idle() {
        let (controller, mut rx) = controller();
        controller.pause();
        controller.resume();
        controller.stop();

        let status = controller.status();
        assert!(!status.active);
        assert!(!status.paused);
        assert!(rx.try_recv().is_err(), "no events expected from no-ops");
    }

    #[test]
    fn stop_is_idempotent() {
        let (controller, _rx) = controller();
        for _ in 0..2 {
            controller.stop();
            let snapshot = controller.snapshot();
            assert!(!snapshot.active);
            assert!(!snapshot.paused);
            assert_eq!(snapshot.current_index, 0);
        }
    }

    #[test]
    fn set_rate_validates_range() {
        let (controller, _rx) = controller();
        assert!(matches!(
            controller.set_rate(10),
            Err(SpeechError::InvalidRate(10))
        ));
        assert!(controller.set_rate(200).is_ok());
        assert_eq!(controller.settings().rate, 200);
    }

    #[test]
    fn set_voice_accepts_default_and_listed_ids_only() {
        let (controller, _rx) = controller();
        assert!(controller.set_voice(DEFAULT_VOICE_ID).is_ok());
        assert!(controller.set_voice("en-us").is_ok());
        assert!(matches!(
            controller.set_voice("martian"),
            Err(SpeechError::UnknownVoice(_))
        ));
        assert!(matches!(
            controller.set_voice("  "),
            Err(SpeechError::UnknownVoice(_))
        ));
        assert_eq!(controller.settings().voice, "en-us");
    }

    #[test]
    fn list_voices_puts_sentinel_first() {
        let (controller, _rx) = controller();
        let voices = controller.list_voices().unwrap();
        assert_eq!(voices[0].id, DEFAULT_VOICE_ID);
        assert_eq!(voices[0].name, DEFAULT_VOICE_NAME);
        assert_eq!(voices[1].id, "en-us");
    }
}
