//! Speech engine abstraction and backend selection.
//!
//! A [`SpeechEngine`] vocalizes one utterance per blocking [`speak`] call
//! and can be interrupted from another thread mid-utterance. The playback
//! worker is the only caller of `speak`; command handlers are the only
//! callers of `interrupt`, `set_rate` and `set_voice`.
//!
//! [`create_engine`] probes `PATH` for a usable speech program and returns
//! the first backend that is available. When none is found, the returned
//! error carries an installation hint and the service layer fails every
//! subsequent command fast with it.
//!
//! [`speak`]: SpeechEngine::speak

pub mod subprocess;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use self::subprocess::{SpeechProgram, SubprocessEngine};

// ── Errors ─────────────────────────────────────────────────────────

/// Errors that can occur at the speech engine boundary.
///
/// Raw I/O and process failures are converted here; nothing below this
/// boundary leaks into the controller.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No speech program was found on `PATH`.
    #[error("no speech program found on PATH (tried {tried}) — install espeak-ng")]
    NoBackend {
        /// Comma-separated list of the program names that were probed.
        tried: String,
    },

    /// Failed to spawn the speech program.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// The speech program could not list its voices.
    #[error("failed to list voices: {0}")]
    ListVoices(String),
}

// ── Voice ──────────────────────────────────────────────────────────

/// One selectable voice as reported by an engine.
///
/// Converted to the port-level DTO by the service layer; the default
/// sentinel entry is added by the controller, not by engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Identifier accepted by the engine's voice flag.
    pub id: String,

    /// Human-readable display name.
    pub name: String,
}

// ── Engine trait ───────────────────────────────────────────────────

/// The external speech synthesis engine the playback worker drives.
///
/// All methods take `&self`: implementations use interior mutability so
/// that `interrupt` can be called from a command handler while the worker
/// thread is blocked inside `speak`.
pub trait SpeechEngine: Send + Sync {
    /// Vocalize `text`, blocking until the utterance finishes or is
    /// interrupted. An interruption is a clean return, not an error.
    fn speak(&self, text: &str) -> Result<(), EngineError>;

    /// Best-effort interruption of the utterance currently in flight.
    /// Safe to call from any thread, including when nothing is speaking.
    fn interrupt(&self);

    /// Set the speaking rate in words per minute. Takes effect from the
    /// next utterance.
    fn set_rate(&self, wpm: u32);

    /// Select a voice, or `None` for the engine's own default. Takes
    /// effect from the next utterance.
    fn set_voice(&self, voice_id: Option<&str>);

    /// List the voices this engine offers.
    fn list_voices(&self) -> Result<Vec<Voice>, EngineError>;

    /// Short backend name for logs and dependency reports.
    fn name(&self) -> &'static str;
}

// ── Backend selection ──────────────────────────────────────────────

/// Probe order: `say` only exists on macOS, so on Linux the chain falls
/// through to espeak-ng and then the legacy espeak binary.
const PROBE_ORDER: [SpeechProgram; 3] = [
    SpeechProgram::Say,
    SpeechProgram::EspeakNg,
    SpeechProgram::Espeak,
];

/// Select a speech backend by probing `PATH`.
///
/// Returns the first available program wrapped in a [`SubprocessEngine`],
/// or [`EngineError::NoBackend`] when none of the known programs is
/// installed.
pub fn create_engine() -> Result<Arc<dyn SpeechEngine>, EngineError> {
    for program in PROBE_ORDER {
        if let Ok(path) = which::which(program.binary()) {
            info!(program = program.binary(), path = %path.display(), "Selected speech backend");
            return Ok(Arc::new(SubprocessEngine::new(program, path)));
        }
    }

    Err(EngineError::NoBackend {
        tried: PROBE_ORDER
            .iter()
            .map(|p| p.binary())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Report which speech programs are present on `PATH`.
///
/// Used by the `check-deps` command; probing does not construct a backend.
#[must_use]
pub fn probe_report() -> Vec<(&'static str, Option<PathBuf>)> {
    PROBE_ORDER
        .iter()
        .map(|p| (p.binary(), which::which(p.binary()).ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_report_covers_every_known_program() {
        let report = probe_report();
        let names: Vec<&str> = report.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["say", "espeak-ng", "espeak"]);
    }

    #[test]
    fn no_backend_error_names_the_probed_programs() {
        let err = EngineError::NoBackend {
            tried: "say, espeak-ng, espeak".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("espeak-ng"));
        assert!(message.contains("PATH"));
    }
}
