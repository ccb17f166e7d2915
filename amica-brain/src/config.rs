//! Configuration for amica-brain

use amica_core::FrameSize;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engagement and dialogue timing/thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    /// Capture frame dimensions; the face-registration size gate is a
    /// fraction of these
    pub frame: FrameSize,
    /// How long a face must be continuously engaged before the robot starts
    /// talking, in milliseconds
    pub converse_threshold_ms: u64,
    /// How long the focus person may be out of sight before the conversation
    /// is abandoned, in milliseconds
    pub disengage_timeout_ms: u64,
    /// How long to wait for an utterance before apologizing, in milliseconds
    pub listen_timeout_ms: u64,
    /// How long to wait for a generated response before apologizing, in
    /// milliseconds
    pub response_timeout_ms: u64,
    /// Minimum face box size to register a new identity, as a fraction of
    /// each frame dimension. Kept separate from the sight-layer detection
    /// thresholds on purpose.
    pub min_registration_face_fraction: f32,
    /// Minimum logged turns before a name extraction is worth attempting
    pub min_exchanges_to_register: usize,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            frame: FrameSize::default(),
            converse_threshold_ms: 2_000,
            disengage_timeout_ms: 6_000,
            listen_timeout_ms: 15_000,
            response_timeout_ms: 5_000,
            min_registration_face_fraction: 1.0 / 20.0,
            min_exchanges_to_register: 6,
        }
    }
}

impl BrainConfig {
    pub fn converse_threshold(&self) -> Duration {
        Duration::from_millis(self.converse_threshold_ms)
    }

    pub fn disengage_timeout(&self) -> Duration {
        Duration::from_millis(self.disengage_timeout_ms)
    }

    pub fn listen_timeout(&self) -> Duration {
        Duration::from_millis(self.listen_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.frame.width <= 0.0 || self.frame.height <= 0.0 {
            return Err("Frame dimensions must be positive".to_string());
        }

        if self.listen_timeout_ms == 0 || self.response_timeout_ms == 0 {
            return Err("Dialogue timeouts must be non-zero".to_string());
        }

        if self.disengage_timeout_ms <= self.converse_threshold_ms {
            return Err("Disengage timeout must exceed the converse threshold".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_registration_face_fraction) {
            return Err("Face registration fraction must be within [0, 1]".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_timings_match_interaction_design() {
        let config = BrainConfig::default();
        assert_eq!(config.converse_threshold(), Duration::from_secs(2));
        assert_eq!(config.disengage_timeout(), Duration::from_secs(6));
        assert_eq!(config.listen_timeout(), Duration::from_secs(15));
        assert_eq!(config.response_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_disengage_must_exceed_converse_threshold() {
        let mut config = BrainConfig::default();
        config.disengage_timeout_ms = 1_000;
        assert!(config.validate().is_err());
    }
}
