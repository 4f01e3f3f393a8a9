#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod controller;
pub mod engine;
pub mod error;
pub mod segment;
pub mod service;
pub mod session;

// Re-export the surface most consumers need
pub use controller::{
    PAUSE_POLL, PlaybackController, PlaybackEvent, SessionSnapshot, StartKind,
};
pub use engine::{EngineError, SpeechEngine, Voice, create_engine, probe_report};
pub use error::SpeechError;
pub use segment::split_sentences;
pub use service::{SpeechService, spawn_event_bridge, status_label};
pub use session::PlaybackSession;

// Silence unused dev-dependency warnings: tokio-test is used by the
// integration tests only
#[cfg(test)]
use tokio_test as _;
