//! Configuration for amica-sight

use amica_core::FrameSize;
use serde::{Deserialize, Serialize};

/// Where the face sits inside a detected body box, as fractions of the body
/// box extents. Body detections refresh far more often than face detections,
/// so the face rectangle derived from the body is the preferred gaze target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceRegion {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for FaceRegion {
    fn default() -> Self {
        Self {
            left: 0.4,
            right: 0.6,
            top: 0.1,
            bottom: 0.15,
        }
    }
}

/// Sight pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SightConfig {
    /// Capture frame dimensions, in pixels
    pub frame: FrameSize,
    /// Run body detection every N ticks
    pub body_interval: u64,
    /// Run face detection every N ticks
    pub face_interval: u64,
    /// Minimum normalized box extent for a person detection to be considered.
    /// Rejects distant noise the robot should not lock onto.
    pub min_person_extent: f32,
    /// Minimum normalized box extent for any other category
    pub min_object_extent: f32,
    /// Face region within a body box
    pub face_region: FaceRegion,
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            frame: FrameSize::default(),
            body_interval: 2,
            face_interval: 10,
            min_person_extent: 0.03,
            min_object_extent: 0.02,
            face_region: FaceRegion::default(),
        }
    }
}

impl SightConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.frame.width <= 0.0 || self.frame.height <= 0.0 {
            return Err("Frame dimensions must be positive".to_string());
        }

        if self.body_interval == 0 || self.face_interval == 0 {
            return Err("Detection intervals must be at least 1".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_person_extent)
            || !(0.0..=1.0).contains(&self.min_object_extent)
        {
            return Err("Minimum extents must be within [0, 1]".to_string());
        }

        let r = &self.face_region;
        if r.left >= r.right || r.top >= r.bottom {
            return Err("Face region must have positive extent".to_string());
        }

        Ok(())
    }
}
