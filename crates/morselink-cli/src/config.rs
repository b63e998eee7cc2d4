//! CLI configuration loading
//!
//! Loads `morselink.toml`: an [`EngineConfig`] plus CLI presentation
//! settings. Every field has a default, so a partial file or no file at
//! all both work; an invalid timing profile fails fast at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use morselink_core::EngineConfig;

use crate::error::{CliError, Result};

/// Complete configuration for the MorseLink CLI application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Engine configuration: timing profile, feedback, alphabet overrides
    pub engine: EngineConfig,

    /// CLI presentation settings
    pub cli: CliConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Print each decoded word as it arrives (demo mode)
    pub live_output: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self { live_output: true }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: AppConfig = toml::from_str(&raw)?;
        config
            .engine
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_valid() {
        let config: AppConfig = toml::from_str("").unwrap();
        config.engine.validate().unwrap();
        assert!(config.cli.live_output);
    }

    #[test]
    fn test_partial_engine_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [engine.profile]
            dot_threshold_ms = 250
            [engine.feedback]
            buzzer_enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.profile.dot_threshold_ms, 250);
        assert!(!config.engine.feedback.buzzer_enabled);
        assert!(config.engine.feedback.led_enabled);
    }
}
