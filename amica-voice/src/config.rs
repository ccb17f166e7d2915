//! Configuration for amica-voice

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Voice subsystem configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Echo-suppression window after playback finishes, in milliseconds.
    /// Capture stays disabled for this long so the robot does not hear the
    /// tail of its own voice.
    pub grace_period_ms: u64,
    /// Directory for cached synthesized audio; `None` disables the cache
    pub cache_dir: Option<PathBuf>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: 1000,
            cache_dir: None,
        }
    }
}

impl VoiceConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.grace_period_ms > 30_000 {
            return Err("Grace period over 30s would deadlock the conversation".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(VoiceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_excessive_grace_rejected() {
        let config = VoiceConfig {
            grace_period_ms: 60_000,
            cache_dir: None,
        };
        assert!(config.validate().is_err());
    }
}
