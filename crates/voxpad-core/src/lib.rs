#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use events::AppEvent;
pub use ports::{
    AppEventEmitter, ControlStates, NoopEmitter, PlaybackStatus, SpeechPlaybackPort,
    SpeechPortError, VoiceInfo,
};
pub use settings::{
    DEFAULT_RATE, DEFAULT_VOICE_ID, DEFAULT_VOICE_NAME, RATE_MAX, RATE_MIN, RATE_STEP,
    SettingsError, SpeechSettings, validate_rate, validate_settings,
};

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
