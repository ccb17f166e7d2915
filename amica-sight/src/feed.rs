//! Latest-value feeds connecting out-of-scope inference to the detectors
//!
//! Whatever process runs the actual models publishes each cycle's results
//! into a watch channel; the pipeline polls the receiving side on its own
//! cadence and always sees the newest frame, never a backlog.

use crate::pipeline::{BodyDetector, FaceDetector};
use amica_core::{DetectedFace, DetectedObject};
use tokio::sync::watch;

/// Polled side of a body detection feed.
pub struct BodyFeed {
    rx: watch::Receiver<Vec<DetectedObject>>,
}

impl BodyDetector for BodyFeed {
    fn detect(&mut self) -> Vec<DetectedObject> {
        self.rx.borrow().clone()
    }
}

/// Create a body detection feed. The sender half goes to the inference side.
pub fn body_feed() -> (watch::Sender<Vec<DetectedObject>>, BodyFeed) {
    let (tx, rx) = watch::channel(Vec::new());
    (tx, BodyFeed { rx })
}

/// Polled side of a face detection feed.
pub struct FaceFeed {
    rx: watch::Receiver<Vec<DetectedFace>>,
}

impl FaceDetector for FaceFeed {
    fn detect(&mut self) -> Vec<DetectedFace> {
        self.rx.borrow().clone()
    }
}

/// Create a face detection feed.
pub fn face_feed() -> (watch::Sender<Vec<DetectedFace>>, FaceFeed) {
    let (tx, rx) = watch::channel(Vec::new());
    (tx, FaceFeed { rx })
}
