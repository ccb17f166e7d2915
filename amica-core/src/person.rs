//! Fused per-tick view of the person in front of the robot

use crate::detect::FaceImage;
use crate::geometry::RectArea;

/// Snapshot of one person, fused from a body detection and/or a face
/// detection for a single tick. Built fresh every tick and never carries
/// forward state; continuity lives in the state machines that hold onto the
/// last `Person` they engaged with.
///
/// Bounding boxes are in pixel coordinates.
#[derive(Debug, Clone)]
pub struct Person {
    /// Recognized identity, when the face matched a registered one.
    pub name: Option<String>,
    pub face_bbox: Option<RectArea>,
    pub body_bbox: Option<RectArea>,
    /// True iff a face detection contributed to this snapshot, regardless of
    /// which box ended up used for the face.
    pub face_detected: bool,
    pub face_image: Option<FaceImage>,
}

impl Person {
    /// Whichever box best localizes the person: the face when present, else
    /// the body.
    pub fn focus_bbox(&self) -> Option<RectArea> {
        self.face_bbox.or(self.body_bbox)
    }
}
