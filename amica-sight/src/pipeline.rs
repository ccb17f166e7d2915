//! The polled sight pipeline: detectors in, one fused Person out per tick

use crate::config::SightConfig;
use crate::focus::FocusTracker;
use crate::merge::PersonMerger;
use amica_core::{DetectedFace, DetectedObject, ObjectCategory, Person, RectArea};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Body detection results for the current frame. Inference runs elsewhere;
/// this is polled once per detection cycle.
pub trait BodyDetector: Send {
    fn detect(&mut self) -> Vec<DetectedObject>;
}

/// Face detection/recognition results for the current frame.
pub trait FaceDetector: Send {
    fn detect(&mut self) -> Vec<DetectedFace>;
}

/// What perception yields each tick.
#[derive(Debug)]
pub struct Observation {
    pub person: Option<Person>,
    /// Body detection ran this tick
    pub body_updated: bool,
    /// Face detection ran this tick
    pub face_updated: bool,
}

/// The perception contract the engagement loop polls once per tick.
pub trait Perception: Send {
    fn observe(&mut self) -> Observation;
}

/// Fuses the body and face detectors into the per-tick `Person` the brain
/// consumes. Body detection runs every `body_interval` ticks and face
/// detection every `face_interval` ticks; between runs the last results are
/// held, which is why the merger prefers the body-derived face rectangle.
pub struct SightPipeline {
    config: SightConfig,
    tracker: FocusTracker,
    merger: PersonMerger,
    bodies: Box<dyn BodyDetector>,
    faces: Box<dyn FaceDetector>,
    focus_body: Option<DetectedObject>,
    focus_face: Option<DetectedFace>,
    derived_face_rect: Option<RectArea>,
    tick: u64,
}

impl SightPipeline {
    pub fn new(
        config: SightConfig,
        bodies: Box<dyn BodyDetector>,
        faces: Box<dyn FaceDetector>,
    ) -> Self {
        let tracker = FocusTracker::new(&config);
        let merger = PersonMerger::new(config.frame);

        Self {
            config,
            tracker,
            merger,
            bodies,
            faces,
            focus_body: None,
            focus_face: None,
            derived_face_rect: None,
            tick: 0,
        }
    }

    fn update_focus_body(&mut self) {
        let candidates = self.bodies.detect();
        let found = self.tracker.find_match(
            &candidates,
            self.focus_body.as_ref(),
            ObjectCategory::Person,
            &HashSet::new(),
            true,
        );

        self.focus_body = found.map(|(obj, distance)| {
            trace!(distance, "Focus body updated");
            obj
        });
        self.derived_face_rect = self
            .focus_body
            .as_ref()
            .map(|body| self.derive_face_rect(&body.bounding_box));
    }

    /// Estimate where the face sits inside a normalized body box, projected
    /// to pixel space.
    fn derive_face_rect(&self, body: &RectArea) -> RectArea {
        let region = &self.config.face_region;
        RectArea::new(
            body.x1 + body.length() * region.left,
            body.y1 + body.height() * region.top,
            body.x1 + body.length() * region.right,
            body.y1 + body.height() * region.bottom,
        )
        .normalized_to(self.config.frame)
    }

    fn update_focus_face(&mut self) {
        let detected = self.faces.detect();
        self.focus_face = self.find_focus_face(detected);
    }

    /// The detected face belonging to the focus body: maximum overlap with
    /// the body box, falling back to the largest face when none overlaps (or
    /// there is no focus body).
    fn find_focus_face(&self, detected: Vec<DetectedFace>) -> Option<DetectedFace> {
        let body_px = self
            .focus_body
            .as_ref()
            .map(|body| body.bounding_box.normalized_to(self.config.frame));

        if let Some(body_px) = body_px {
            let mut max_overlap = 0.0;
            let mut best: Option<&DetectedFace> = None;

            for face in &detected {
                let (overlap, _) = face.bounding_box.overlap_area(&body_px);
                if overlap > max_overlap {
                    max_overlap = overlap;
                    best = Some(face);
                }
            }

            if let Some(face) = best {
                return Some(face.clone());
            }
        }

        Self::largest_face(detected)
    }

    fn largest_face(detected: Vec<DetectedFace>) -> Option<DetectedFace> {
        let mut largest_area = 0.0;
        let mut largest: Option<DetectedFace> = None;

        for face in detected {
            let area = face.bounding_box.area();
            if area > largest_area {
                largest_area = area;
                largest = Some(face);
            }
        }

        largest
    }
}

impl Perception for SightPipeline {
    fn observe(&mut self) -> Observation {
        let body_updated = self.tick % self.config.body_interval == 0;
        if body_updated {
            self.update_focus_body();
        }

        let face_updated = self.tick % self.config.face_interval == 0;
        if face_updated {
            self.update_focus_face();
        }

        self.tick += 1;

        // Either a body or a face must be in focus to yield a person
        let person = if self.focus_body.is_some() || self.focus_face.is_some() {
            self.merger.merge(
                self.focus_body.as_ref(),
                self.derived_face_rect,
                self.focus_face.as_ref(),
            )
        } else {
            None
        };

        if person.is_some() {
            debug!(body_updated, face_updated, "Person in focus");
        }

        Observation {
            person,
            body_updated,
            face_updated,
        }
    }
}
