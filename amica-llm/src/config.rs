//! Configuration for amica-llm

use serde::{Deserialize, Serialize};

/// Language provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// OpenAI-compatible API root
    pub base_url: String,
    /// Model used for both conversation and name extraction
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature for conversational replies
    pub temperature: f32,
    /// Maximum tokens in a conversational reply
    pub reply_max_tokens: u32,
    /// Maximum tokens in a name extraction answer
    pub extraction_max_tokens: u32,
    /// How many trailing transcript lines the conversation prompt carries
    pub max_history: usize,
    /// Per-request HTTP timeout, seconds
    pub request_timeout_secs: u64,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.9,
            reply_max_tokens: 150,
            extraction_max_tokens: 64,
            max_history: 20,
            request_timeout_secs: 30,
        }
    }
}

impl LanguageConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.base_url.starts_with("https://") {
            return Err("Base URL must use https".to_string());
        }

        if self.model.is_empty() {
            return Err("Model must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("Temperature must be within [0, 2]".to_string());
        }

        if self.max_history == 0 {
            return Err("History window must be at least 1 line".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LanguageConfig::default().validate().is_ok());
    }

    #[test]
    fn test_plain_http_rejected() {
        let mut config = LanguageConfig::default();
        config.base_url = "http://api.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let mut config = LanguageConfig::default();
        config.temperature = 3.0;
        assert!(config.validate().is_err());
    }
}
