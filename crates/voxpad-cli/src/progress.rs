//! Terminal progress printer — the status-bar stand-in.
//!
//! Implements [`AppEventEmitter`] by printing one line per playback
//! event to stderr, keeping stdout free for the control prompt.

use voxpad_core::{AppEvent, AppEventEmitter};

/// Prints playback progress lines to stderr.
#[derive(Debug, Clone, Default)]
pub struct ProgressPrinter;

impl ProgressPrinter {
    pub const fn new() -> Self {
        Self
    }
}

impl AppEventEmitter for ProgressPrinter {
    fn emit(&self, event: AppEvent) {
        match event {
            AppEvent::SpeechStarted { sentence_count } => {
                eprintln!("Reading {sentence_count} sentence(s)...");
            }
            AppEvent::SentenceStarted { index, total } => {
                eprintln!("  sentence {} of {total}", index + 1);
            }
            AppEvent::SpeechPaused => eprintln!("Paused."),
            AppEvent::SpeechResumed => eprintln!("Resumed."),
            AppEvent::SpeechStopped => eprintln!("Stopped."),
            AppEvent::SpeechFinished { completed } => {
                if completed {
                    eprintln!("Finished.");
                } else {
                    eprintln!("Playback ended early.");
                }
            }
        }
    }

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}
