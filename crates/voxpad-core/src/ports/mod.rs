//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core domain expects from adapters.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No engine, process, or terminal types in any signature
//! - Channel types never leak into the public API surface
//! - Intent-based methods (commands, not implementation steps)

pub mod event_emitter;
pub mod speech;

// Re-export port traits and DTOs for convenience
pub use event_emitter::{AppEventEmitter, NoopEmitter};
pub use speech::{ControlStates, PlaybackStatus, SpeechPlaybackPort, SpeechPortError, VoiceInfo};
