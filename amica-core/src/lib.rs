//! amica-core: shared value types for the amica interaction loop
//!
//! Geometry, per-tick detection snapshots, the fused `Person` view, the
//! conversation log, and the stopwatch primitive the state machines measure
//! elapsed time against. Everything here is a plain value type; continuity
//! across ticks lives in the state machines that hold onto these values.

pub mod convo;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod person;
pub mod persona;
pub mod time;

pub use convo::{ConversationLog, Speaker, Utterance};
pub use detect::{DetectedFace, DetectedObject, FaceImage, ObjectCategory};
pub use error::{Error, Result};
pub use geometry::{FrameSize, RectArea};
pub use person::Person;
pub use persona::Persona;
pub use time::Stopwatch;
