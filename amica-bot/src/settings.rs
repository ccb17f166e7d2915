//! Bot configuration file

use amica_brain::BrainConfig;
use amica_core::Persona;
use amica_llm::LanguageConfig;
use amica_sight::SightConfig;
use amica_voice::VoiceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the bot binary wires together, loadable from one toml file.
/// Every section falls back to its defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub persona: Persona,
    pub sight: SightConfig,
    pub voice: VoiceConfig,
    pub brain: BrainConfig,
    pub language: LanguageConfig,
    /// Where newly registered face images are stored
    pub faces_dir: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            persona: Persona::default(),
            sight: SightConfig::default(),
            voice: VoiceConfig::default(),
            brain: BrainConfig::default(),
            language: LanguageConfig::default(),
            faces_dir: PathBuf::from("faces"),
        }
    }
}

impl BotConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<(), String> {
        self.persona.validate()?;
        self.sight.validate()?;
        self.voice.validate()?;
        self.brain.validate()?;
        self.language.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: BotConfig = toml::from_str(
            r#"
            faces_dir = "custom-faces"

            [persona]
            name = "Nova"
            background = "who lives on a desk."

            [brain]
            disengage_timeout_ms = 8000
            "#,
        )
        .unwrap();

        assert_eq!(config.persona.name, "Nova");
        assert_eq!(config.faces_dir, PathBuf::from("custom-faces"));
        assert_eq!(config.brain.disengage_timeout_ms, 8000);
        // Untouched sections keep their defaults
        assert_eq!(config.brain.listen_timeout_ms, 15_000);
        assert_eq!(config.sight.body_interval, 2);
    }
}
