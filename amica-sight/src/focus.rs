//! Overlap-based focus tracking across frames

use crate::config::SightConfig;
use amica_core::{DetectedObject, ObjectCategory};
use std::collections::HashSet;
use tracing::debug;

/// Re-identifies the focus target across frames from independent per-frame
/// detection lists. Continuity comes from bounding-box overlap between
/// consecutive frames, not identity features: O(n) per tick, no persistent
/// track ids, robust to brief recognizer misfires. Single focus target by
/// design.
pub struct FocusTracker {
    min_person_extent: f32,
    min_object_extent: f32,
}

impl FocusTracker {
    pub fn new(config: &SightConfig) -> Self {
        Self {
            min_person_extent: config.min_person_extent,
            min_object_extent: config.min_object_extent,
        }
    }

    /// Select the candidate that continues `previous`, or a fresh target.
    ///
    /// Candidates are filtered to `category`, minus `exclusions`, minus
    /// detections below the minimum-size-to-register threshold. With a
    /// previous focus, the candidate with the largest bounding-box overlap
    /// wins (ties go to the first seen). Without one, or when nothing
    /// overlaps and `allow_new` is set, the largest candidate by area is
    /// taken instead.
    ///
    /// Returns the match plus its estimated distance.
    pub fn find_match(
        &self,
        candidates: &[DetectedObject],
        previous: Option<&DetectedObject>,
        category: ObjectCategory,
        exclusions: &HashSet<ObjectCategory>,
        allow_new: bool,
    ) -> Option<(DetectedObject, f32)> {
        let eligible: Vec<&DetectedObject> = candidates
            .iter()
            .filter(|obj| {
                obj.category == category
                    && !exclusions.contains(&obj.category)
                    && self.is_big_enough(obj)
            })
            .collect();

        if let Some(previous) = previous {
            let mut max_overlap = 0.0;
            let mut best: Option<&DetectedObject> = None;

            for &obj in &eligible {
                let (overlap, _) = previous.bounding_box.overlap_area(&obj.bounding_box);
                if overlap > max_overlap {
                    max_overlap = overlap;
                    best = Some(obj);
                }
            }

            if let Some(found) = best {
                return Some((found.clone(), found.estimated_distance()));
            }

            debug!("Focus target lost, no overlapping candidate");
            if !allow_new {
                return None;
            }
        } else if !allow_new {
            return None;
        }

        self.largest(&eligible)
    }

    /// Largest-area candidate, the fallback when no overlap continues the
    /// previous focus.
    fn largest(&self, eligible: &[&DetectedObject]) -> Option<(DetectedObject, f32)> {
        let mut largest_area = 0.0;
        let mut largest: Option<&DetectedObject> = None;

        for &obj in eligible {
            let area = obj.bounding_box.area();
            if area > largest_area {
                largest_area = area;
                largest = Some(obj);
            }
        }

        largest.map(|obj| (obj.clone(), obj.estimated_distance()))
    }

    fn is_big_enough(&self, obj: &DetectedObject) -> bool {
        let min_extent = match obj.category {
            ObjectCategory::Person => self.min_person_extent,
            _ => self.min_object_extent,
        };

        obj.bounding_box.length() >= min_extent
    }
}
