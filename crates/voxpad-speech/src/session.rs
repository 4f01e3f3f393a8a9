//! The shared playback record — one live session at a time.
//!
//! Every field here is read and written only while holding the single
//! session mutex owned by the controller. The `epoch` counter identifies
//! which `start()` installed the current contents: the worker captures the
//! epoch at spawn and refuses to touch state belonging to a later session,
//! which is what makes a `stop()`/`start()` racing an in-flight utterance
//! safe.

use voxpad_core::PlaybackStatus;

/// Shared mutable state of one playback session.
///
/// Invariants (enforced by the controller, checked by tests):
/// - `paused` implies `active`
/// - `current_index <= sentences.len()`; equality signals natural
///   completion
/// - `current_index` never decreases within one epoch
#[derive(Debug, Default)]
pub struct PlaybackSession {
    /// The text being read. Set once per session, cleared on stop.
    pub source_text: String,

    /// Sentences of `source_text`, computed once by the worker on its
    /// first pass. Empty until then; never recomputed mid-session.
    pub sentences: Vec<String>,

    /// Index of the next sentence to speak.
    pub current_index: usize,

    /// Live from `start()` until stop or natural completion.
    pub active: bool,

    /// Paused flag; only ever set while `active`.
    pub paused: bool,

    /// Identity of the `start()` call that installed this session.
    /// Incremented on every install; never reset.
    pub epoch: u64,
}

impl PlaybackSession {
    /// Install a fresh session over this record, superseding whatever was
    /// here. The caller must have stopped the previous worker first.
    pub fn install(&mut self, text: String) {
        self.source_text = text;
        self.sentences = Vec::new();
        self.current_index = 0;
        self.active = true;
        self.paused = false;
        self.epoch += 1;
    }

    /// Clear all session fields back to the idle state. The epoch is kept
    /// so a stale worker can still recognise that it was superseded.
    pub fn clear(&mut self) {
        self.source_text.clear();
        self.sentences = Vec::new();
        self.current_index = 0;
        self.active = false;
        self.paused = false;
    }

    /// Whether this record still belongs to the session a worker captured
    /// at spawn.
    #[must_use]
    pub const fn is_live(&self, epoch: u64) -> bool {
        self.active && self.epoch == epoch
    }

    /// The externally visible status flags.
    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            active: self.active,
            paused: self.paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_idle() {
        let session = PlaybackSession::default();
        assert!(!session.active);
        assert!(!session.paused);
        assert_eq!(session.current_index, 0);
        assert!(session.sentences.is_empty());
    }

    #[test]
    fn install_resets_position_and_bumps_epoch() {
        let mut session = PlaybackSession::default();
        session.install("First text.".to_string());
        let first_epoch = session.epoch;
        session.current_index = 3;
        session.paused = true;

        session.install("Second text.".to_string());
        assert_eq!(session.source_text, "Second text.");
        assert_eq!(session.current_index, 0);
        assert!(session.active);
        assert!(!session.paused);
        assert_eq!(session.epoch, first_epoch + 1);
    }

    #[test]
    fn clear_keeps_epoch() {
        let mut session = PlaybackSession::default();
        session.install("Text.".to_string());
        let epoch = session.epoch;

        session.clear();
        assert!(!session.active);
        assert!(!session.paused);
        assert_eq!(session.current_index, 0);
        assert!(session.source_text.is_empty());
        assert_eq!(session.epoch, epoch);
    }

    #[test]
    fn liveness_requires_matching_epoch_and_active_flag() {
        let mut session = PlaybackSession::default();
        session.install("Text.".to_string());
        let epoch = session.epoch;
        assert!(session.is_live(epoch));

        session.install("Newer text.".to_string());
        assert!(!session.is_live(epoch));

        session.clear();
        assert!(!session.is_live(session.epoch));
    }

    #[test]
    fn status_reflects_flags() {
        let mut session = PlaybackSession::default();
        assert!(!session.status().active);

        session.install("Text.".to_string());
        assert!(session.status().active);
        assert!(!session.status().paused);

        session.paused = true;
        assert!(session.status().paused);
    }
}
