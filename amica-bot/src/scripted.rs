//! Scripted stand-ins for the out-of-scope collaborators
//!
//! Enough to run the whole interaction loop on a laptop: a person wanders
//! into frame on a fixed schedule, their face resolves shortly after, and
//! playback is a timed no-op.

use amica_core::{DetectedFace, DetectedObject, ObjectCategory, RectArea};
use amica_sight::{BodyDetector, FaceDetector};
use amica_voice::{AudioSink, Synthesizer, VoiceError};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::info;

/// Walks one person through a visit: absent, present at the left, present at
/// the right, absent again. Cycles forever.
pub struct ScriptedBodies {
    tick: u64,
}

impl ScriptedBodies {
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    fn person_at(x1: f32, y1: f32) -> DetectedObject {
        DetectedObject::new(
            ObjectCategory::Person,
            RectArea::new(x1, y1, x1 + 0.3, y1 + 0.7),
            0.9,
        )
    }
}

impl Default for ScriptedBodies {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyDetector for ScriptedBodies {
    fn detect(&mut self) -> Vec<DetectedObject> {
        let phase = self.tick % 800;
        self.tick += 1;

        match phase {
            0..=99 => vec![],
            100..=399 => vec![Self::person_at(0.1, 0.2)],
            400..=599 => vec![Self::person_at(0.5, 0.2)],
            _ => vec![],
        }
    }
}

/// Produces an anonymous face inside the scripted person's head region while
/// the person is in frame.
pub struct ScriptedFaces {
    tick: u64,
    frame: amica_core::FrameSize,
}

impl ScriptedFaces {
    pub fn new(frame: amica_core::FrameSize) -> Self {
        Self { tick: 0, frame }
    }
}

impl FaceDetector for ScriptedFaces {
    fn detect(&mut self) -> Vec<DetectedFace> {
        let phase = self.tick % 800;
        self.tick += 1;

        let face_at = |x1: f32| {
            RectArea::new(x1 + 0.1, 0.25, x1 + 0.2, 0.35)
                .normalized_to(self.frame)
        };

        match phase {
            100..=399 => vec![DetectedFace::new(None, face_at(0.1), 0.6, None)],
            400..=599 => vec![DetectedFace::new(None, face_at(0.5), 0.6, None)],
            _ => vec![],
        }
    }
}

/// Synthesizer stub: no engine attached, audio is an empty payload.
pub struct SilentSynthesizer;

#[async_trait]
impl Synthesizer for SilentSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Bytes, VoiceError> {
        Ok(Bytes::new())
    }
}

/// Sink stub: logs the utterance and holds the speaking flag for roughly as
/// long as saying it would take.
pub struct ConsoleSink;

#[async_trait]
impl AudioSink for ConsoleSink {
    async fn play(&self, audio: Bytes) -> Result<(), VoiceError> {
        info!(bytes = audio.len(), "Playing synthesized audio");
        tokio::time::sleep(Duration::from_millis(800)).await;
        Ok(())
    }
}
