//! Axis-aligned rectangle math for detection bounding boxes

use serde::{Deserialize, Serialize};

/// Capture frame dimensions, in pixels. The pixel space fused `Person`
/// bounding boxes live in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f32,
    pub height: f32,
}

impl FrameSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Axis-aligned bounding box. Works in either normalized [0,1] or pixel
/// coordinates; callers keep track of which space a box is in.
///
/// Invariant: `x1 <= x2` and `y1 <= y2`, enforced by the constructor. All
/// operations are immutable and return new values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectArea {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl RectArea {
    /// Build a box from two corner points, normalising the corner order.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self { x1, y1, x2, y2 }
    }

    /// Smallest box enclosing all of `points`. Returns `None` for an empty
    /// slice.
    pub fn from_points(points: &[(f32, f32)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut x1 = first.0;
        let mut y1 = first.1;
        let mut x2 = first.0;
        let mut y2 = first.1;

        for &(x, y) in rest {
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x);
            y2 = y2.max(y);
        }

        Some(Self::new(x1, y1, x2, y2))
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Horizontal extent of the box. Detection heuristics (minimum size to
    /// register, estimated distance) key on this axis.
    pub fn length(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.height() / self.width()
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// True when `self` lies entirely inside `other`.
    pub fn contains(&self, other: &RectArea) -> bool {
        self.contains_point(other.x1, other.y1) && self.contains_point(other.x2, other.y2)
    }

    pub fn overlaps(&self, other: &RectArea) -> bool {
        other.x1 <= self.x2 && other.y1 <= self.y2 && other.x2 >= self.x1 && other.y2 >= self.y1
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &RectArea) -> RectArea {
        RectArea::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Intersection of the two boxes, or `None` when they do not overlap.
    pub fn intersect(&self, other: &RectArea) -> Option<RectArea> {
        if !self.overlaps(other) {
            return None;
        }

        Some(RectArea::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        ))
    }

    /// Absolute intersection area plus the fraction of `other` covered.
    pub fn overlap_area(&self, other: &RectArea) -> (f32, f32) {
        match self.intersect(other) {
            Some(overlap) => {
                let area = overlap.area();
                (area, area / other.area())
            }
            None => (0.0, 0.0),
        }
    }

    /// Distance between the two box centers.
    pub fn distance_to(&self, other: &RectArea) -> f32 {
        let (cx, cy) = self.center();
        let (ox, oy) = other.center();
        ((cx - ox).powi(2) + (cy - oy).powi(2)).sqrt()
    }

    pub fn scaled(&self, scale: f32) -> RectArea {
        RectArea::new(
            self.x1 * scale,
            self.y1 * scale,
            self.x2 * scale,
            self.y2 * scale,
        )
    }

    /// Grow (or shrink) the box about its center.
    pub fn grown(&self, scale: f32) -> RectArea {
        let (cx, cy) = self.center();
        let half_w = self.width() * scale / 2.0;
        let half_h = self.height() * scale / 2.0;

        RectArea::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    /// Project from `frame` pixel space into normalized [0,1] coordinates.
    pub fn normalized_from(&self, frame: FrameSize) -> RectArea {
        RectArea::new(
            self.x1 / frame.width,
            self.y1 / frame.height,
            self.x2 / frame.width,
            self.y2 / frame.height,
        )
    }

    /// Project from normalized [0,1] coordinates into `frame` pixel space.
    pub fn normalized_to(&self, frame: FrameSize) -> RectArea {
        RectArea::new(
            self.x1 * frame.width,
            self.y1 * frame.height,
            self.x2 * frame.width,
            self.y2 * frame.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_order_normalised() {
        let rect = RectArea::new(0.8, 0.9, 0.2, 0.1);
        assert_eq!(rect.x1, 0.2);
        assert_eq!(rect.y1, 0.1);
        assert_eq!(rect.x2, 0.8);
        assert_eq!(rect.y2, 0.9);
    }

    #[test]
    fn test_area_and_extents() {
        let rect = RectArea::new(0.0, 0.0, 4.0, 2.0);
        assert_eq!(rect.width(), 4.0);
        assert_eq!(rect.height(), 2.0);
        assert_eq!(rect.length(), 4.0);
        assert_eq!(rect.area(), 8.0);
        assert_eq!(rect.aspect_ratio(), 0.5);
        assert_eq!(rect.center(), (2.0, 1.0));
    }

    #[test]
    fn test_from_points() {
        let rect = RectArea::from_points(&[(3.0, 1.0), (0.0, 4.0), (2.0, 2.0)]).unwrap();
        assert_eq!(rect, RectArea::new(0.0, 1.0, 3.0, 4.0));
        assert!(RectArea::from_points(&[]).is_none());
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = RectArea::new(0.0, 0.0, 2.0, 2.0);
        let b = RectArea::new(1.0, 1.0, 3.0, 3.0);
        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap, RectArea::new(1.0, 1.0, 2.0, 2.0));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = RectArea::new(0.0, 0.0, 1.0, 1.0);
        let b = RectArea::new(2.0, 2.0, 3.0, 3.0);
        assert!(a.intersect(&b).is_none());
        assert_eq!(a.overlap_area(&b), (0.0, 0.0));
    }

    #[test]
    fn test_overlap_area_ratio() {
        let a = RectArea::new(0.0, 0.0, 2.0, 2.0);
        let b = RectArea::new(1.0, 0.0, 3.0, 2.0);
        let (area, ratio) = a.overlap_area(&b);
        assert_eq!(area, 2.0);
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn test_union() {
        let a = RectArea::new(0.0, 0.0, 1.0, 1.0);
        let b = RectArea::new(2.0, 2.0, 3.0, 3.0);
        assert_eq!(a.union(&b), RectArea::new(0.0, 0.0, 3.0, 3.0));
    }

    #[test]
    fn test_containment() {
        let outer = RectArea::new(0.0, 0.0, 4.0, 4.0);
        let inner = RectArea::new(1.0, 1.0, 2.0, 2.0);
        assert!(!inner.contains(&outer));
        assert!(outer.contains(&inner));
        assert!(outer.contains_point(2.0, 2.0));
        assert!(!outer.contains_point(5.0, 2.0));
    }

    #[test]
    fn test_normalised_round_trip() {
        let frame = FrameSize::new(1280.0, 720.0);
        let rect = RectArea::new(128.0, 72.0, 640.0, 360.0);
        let norm = rect.normalized_from(frame);
        assert!((norm.x1 - 0.1).abs() < 1e-6);
        assert!((norm.y2 - 0.5).abs() < 1e-6);
        let back = norm.normalized_to(frame);
        assert!((back.x1 - rect.x1).abs() < 1e-3);
        assert!((back.y2 - rect.y2).abs() < 1e-3);
    }

    #[test]
    fn test_grown_keeps_center() {
        let rect = RectArea::new(1.0, 1.0, 3.0, 3.0);
        let grown = rect.grown(2.0);
        assert_eq!(grown.center(), rect.center());
        assert_eq!(grown.width(), 4.0);
        assert_eq!(grown.height(), 4.0);
    }

    #[test]
    fn test_distance_to() {
        let a = RectArea::new(0.0, 0.0, 2.0, 2.0);
        let b = RectArea::new(3.0, 0.0, 5.0, 2.0);
        assert_eq!(a.distance_to(&b), 3.0);
    }
}
