//! Per-tick detection snapshots produced by the perception collaborators

use crate::geometry::RectArea;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Captured face pixels, shared cheaply across the Person snapshots that
/// reference them.
pub type FaceImage = Arc<image::RgbImage>;

/// Closed set of object labels the detector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectCategory {
    Person,
    Dog,
}

impl ObjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectCategory::Person => "person",
            ObjectCategory::Dog => "dog",
        }
    }
}

/// One object detection, produced fresh every detection cycle and never
/// mutated. Bounding box is in normalized [0,1] coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedObject {
    pub category: ObjectCategory,
    pub bounding_box: RectArea,
    pub confidence: f32,
}

impl DetectedObject {
    pub fn new(category: ObjectCategory, bounding_box: RectArea, confidence: f32) -> Self {
        Self {
            category,
            bounding_box,
            confidence,
        }
    }

    /// Monocular depth proxy: the inverse of the bounding box's longer-axis
    /// extent. A nearer object fills more of the frame.
    pub fn estimated_distance(&self) -> f32 {
        1.0 / self.bounding_box.width().max(self.bounding_box.height())
    }
}

/// One face detection, with the recognized identity when the match was close
/// enough. Bounding box is in pixel coordinates.
#[derive(Debug, Clone)]
pub struct DetectedFace {
    /// Recognized identity, or `None` for an unknown face.
    pub name: Option<String>,
    pub bounding_box: RectArea,
    /// Embedding distance to the closest registered identity.
    pub match_distance: f32,
    pub face_image: Option<FaceImage>,
}

impl DetectedFace {
    pub fn new(
        name: Option<String>,
        bounding_box: RectArea,
        match_distance: f32,
        face_image: Option<FaceImage>,
    ) -> Self {
        Self {
            name,
            bounding_box,
            match_distance,
            face_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_as_str() {
        assert_eq!(ObjectCategory::Person.as_str(), "person");
        assert_eq!(ObjectCategory::Dog.as_str(), "dog");
    }

    #[test]
    fn test_estimated_distance_inverse_of_longer_axis() {
        let near = DetectedObject::new(
            ObjectCategory::Person,
            RectArea::new(0.0, 0.0, 0.2, 0.8),
            0.9,
        );
        let far = DetectedObject::new(
            ObjectCategory::Person,
            RectArea::new(0.0, 0.0, 0.1, 0.2),
            0.9,
        );
        assert!(near.estimated_distance() < far.estimated_distance());
        assert!((near.estimated_distance() - 1.25).abs() < 1e-6);
        assert!((far.estimated_distance() - 5.0).abs() < 1e-5);
    }
}
