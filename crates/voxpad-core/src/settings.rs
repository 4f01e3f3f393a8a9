//! Speech settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies. The
//! values mirror what the playback controls expose: a words-per-minute
//! rate with a bounded range and a voice identifier with a sentinel for
//! the engine's own default voice.

use serde::{Deserialize, Serialize};

/// Slowest supported speaking rate, in words per minute.
pub const RATE_MIN: u32 = 90;

/// Fastest supported speaking rate, in words per minute.
pub const RATE_MAX: u32 = 280;

/// Step used by rate controls (spinners, `rate +`/`rate -` style input).
pub const RATE_STEP: u32 = 5;

/// Default speaking rate, in words per minute.
pub const DEFAULT_RATE: u32 = 175;

/// Sentinel voice id meaning "use the engine's default voice".
///
/// Engines never receive this id; adapters translate it to "no explicit
/// voice selection".
pub const DEFAULT_VOICE_ID: &str = "default";

/// Display name shown for the sentinel default voice.
pub const DEFAULT_VOICE_NAME: &str = "(default)";

/// Speech playback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechSettings {
    /// Speaking rate in words per minute (`RATE_MIN..=RATE_MAX`).
    pub rate: u32,

    /// Selected voice id, or [`DEFAULT_VOICE_ID`] for the engine default.
    pub voice: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            voice: DEFAULT_VOICE_ID.to_string(),
        }
    }
}

impl SpeechSettings {
    /// Create settings with the built-in defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Whether the sentinel default voice is selected.
    #[must_use]
    pub fn is_default_voice(&self) -> bool {
        self.voice == DEFAULT_VOICE_ID
    }

    /// The explicit voice id to hand to an engine, if any.
    #[must_use]
    pub fn explicit_voice(&self) -> Option<&str> {
        if self.is_default_voice() {
            None
        } else {
            Some(&self.voice)
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Rate must be between {RATE_MIN} and {RATE_MAX} wpm, got {0}")]
    InvalidRate(u32),

    #[error("Voice id cannot be empty")]
    EmptyVoice,
}

/// Validate a speaking rate against the supported range.
pub const fn validate_rate(rate: u32) -> Result<(), SettingsError> {
    if rate < RATE_MIN || rate > RATE_MAX {
        return Err(SettingsError::InvalidRate(rate));
    }
    Ok(())
}

/// Validate settings values.
pub fn validate_settings(settings: &SpeechSettings) -> Result<(), SettingsError> {
    validate_rate(settings.rate)?;

    if settings.voice.trim().is_empty() {
        return Err(SettingsError::EmptyVoice);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = SpeechSettings::with_defaults();
        assert_eq!(settings.rate, DEFAULT_RATE);
        assert_eq!(settings.voice, DEFAULT_VOICE_ID);
        assert!(settings.is_default_voice());
        assert_eq!(settings.explicit_voice(), None);
    }

    #[test]
    fn test_validate_settings_valid() {
        let settings = SpeechSettings::with_defaults();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_rate_too_slow() {
        assert!(matches!(validate_rate(80), Err(SettingsError::InvalidRate(80))));
    }

    #[test]
    fn test_validate_rate_too_fast() {
        assert!(matches!(
            validate_rate(300),
            Err(SettingsError::InvalidRate(300))
        ));
    }

    #[test]
    fn test_validate_rate_bounds_inclusive() {
        assert!(validate_rate(RATE_MIN).is_ok());
        assert!(validate_rate(RATE_MAX).is_ok());
    }

    #[test]
    fn test_validate_empty_voice() {
        let settings = SpeechSettings {
            voice: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyVoice)
        ));
    }

    #[test]
    fn test_explicit_voice() {
        let settings = SpeechSettings {
            voice: "pt-br".to_string(),
            ..Default::default()
        };
        assert!(!settings.is_default_voice());
        assert_eq!(settings.explicit_voice(), Some("pt-br"));
    }

    #[test]
    fn test_settings_serde_round_trip() {
        let settings = SpeechSettings {
            rate: 200,
            voice: "en-us".to_string(),
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"rate\":200"));
        assert!(json.contains("\"voice\":\"en-us\""));

        let back: SpeechSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_settings_deserialize_defaults_missing_fields() {
        let settings: SpeechSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, SpeechSettings::with_defaults());
    }
}
