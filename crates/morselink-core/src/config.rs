//! Engine configuration
//!
//! [`EngineConfig`] gathers everything the runtime needs to wire an engine:
//! the timing profile, channel buffer sizes, feedback preferences, the
//! encode policy, and alphabet overrides. All fields deserialize from the
//! CLI's TOML config file with serde defaults, so a partial file works.

use serde::{Deserialize, Serialize};

use crate::alphabet::AlphabetOverride;
use crate::channel::ChannelConfig;
use crate::codec::EncodePolicy;
use crate::errors::{EngineError, Result};
use crate::profile::TimingProfile;

// ----------------------------------------------------------------------------
// Feedback Configuration
// ----------------------------------------------------------------------------

/// Which local feedback actuators render pulses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub led_enabled: bool,
    pub buzzer_enabled: bool,
    /// Buzzer tone in hertz, passed through to the hardware layer
    pub buzzer_frequency_hz: u32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            led_enabled: true,
            buzzer_enabled: true,
            buzzer_frequency_hz: 600,
        }
    }
}

impl FeedbackConfig {
    /// True when at least one actuator renders pulses
    pub fn any_enabled(&self) -> bool {
        self.led_enabled || self.buzzer_enabled
    }
}

// ----------------------------------------------------------------------------
// Engine Configuration
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub profile: TimingProfile,
    pub channels: ChannelConfig,
    pub feedback: FeedbackConfig,
    pub encode_policy: EncodePolicy,
    /// Table entries replacing or extending the canonical alphabet
    pub alphabet_overrides: Vec<AlphabetOverride>,
}

impl EngineConfig {
    /// Validate the profile and overrides together
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        if self.channels.command_buffer_size == 0
            || self.channels.event_buffer_size == 0
            || self.channels.effect_buffer_size == 0
            || self.channels.app_event_buffer_size == 0
        {
            return Err(EngineError::config_error("channel buffers must be non-zero"));
        }
        // Surface alphabet problems at startup rather than first use
        crate::alphabet::Alphabet::with_overrides(&self.alphabet_overrides)?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut config = EngineConfig::default();
        config.profile.dot_threshold_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = EngineConfig::default();
        config.alphabet_overrides.push(AlphabetOverride {
            character: '#',
            pattern: ".-".to_string(), // collides with A
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_deserializes_with_defaults() {
        let parsed: EngineConfig = toml::from_str(
            r#"
            [profile]
            dot_threshold_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(parsed.profile.dot_threshold_ms, 250);
        assert_eq!(
            parsed.profile.char_gap_threshold_ms,
            TimingProfile::default().char_gap_threshold_ms
        );
        assert!(parsed.feedback.led_enabled);
    }
}
