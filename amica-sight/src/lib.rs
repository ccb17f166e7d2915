//! amica-sight: the perception layer of the amica interaction loop
//!
//! Turns raw per-frame detection lists into a single fused `Person` snapshot
//! per tick: overlap-based focus tracking, body/face fusion, and the polled
//! pipeline the engagement machine consumes. Model inference itself is out of
//! scope and reaches this crate through the detector contracts.

pub mod config;
pub mod feed;
pub mod focus;
pub mod merge;
pub mod pipeline;
pub mod registry;

pub use config::SightConfig;
pub use feed::{body_feed, face_feed, BodyFeed, FaceFeed};
pub use focus::FocusTracker;
pub use merge::PersonMerger;
pub use pipeline::{BodyDetector, FaceDetector, Observation, Perception, SightPipeline};
pub use registry::{DirectoryRegistry, IdentityRegistry};
