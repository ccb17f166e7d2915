//! Body/face fusion into a per-tick Person snapshot

use amica_core::{DetectedFace, DetectedObject, FrameSize, Person, RectArea};

/// Fuses a body detection and a face detection into one `Person` snapshot.
///
/// The face box prefers the body-derived estimate over the literal detected
/// face box: body detections refresh several times faster, and steering the
/// head at the slower literal face box makes it oscillate around the target.
/// The literal face box is used only when no body was matched this tick.
pub struct PersonMerger {
    frame: FrameSize,
}

impl PersonMerger {
    pub fn new(frame: FrameSize) -> Self {
        Self { frame }
    }

    /// Produce the fused snapshot, or `None` when neither input is present.
    ///
    /// `body` carries a normalized box; `derived_face_rect` and the face box
    /// are already in pixel space. The resulting `Person` is entirely in
    /// pixel space and always has *some* bounding box once any signal exists.
    pub fn merge(
        &self,
        body: Option<&DetectedObject>,
        derived_face_rect: Option<RectArea>,
        face: Option<&DetectedFace>,
    ) -> Option<Person> {
        if body.is_none() && face.is_none() {
            return None;
        }

        let mut person = Person {
            name: None,
            face_bbox: None,
            body_bbox: None,
            face_detected: face.is_some(),
            face_image: None,
        };

        if let Some(body) = body {
            person.face_bbox = derived_face_rect;
            person.body_bbox = Some(body.bounding_box.normalized_to(self.frame));
        }

        if let Some(face) = face {
            person.name = face.name.clone();
            person.face_image = face.face_image.clone();

            if person.face_bbox.is_none() {
                person.face_bbox = Some(face.bounding_box);
            }
            if person.body_bbox.is_none() {
                person.body_bbox = person.face_bbox;
            }
        }

        Some(person)
    }
}
