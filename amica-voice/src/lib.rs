//! amica-voice: hearing and speech output for the amica interaction loop
//!
//! Streaming speech capture and text-to-speech playback are out-of-scope
//! services; this crate owns the polled contracts the brain drives them
//! through, the fire-and-forget playback task with its echo-suppression
//! grace window, and the on-disk synthesis cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod hearing;
pub mod speech;

pub use cache::TtsCache;
pub use config::VoiceConfig;
pub use error::VoiceError;
pub use hearing::{Hearing, StreamHearing};
pub use speech::{AudioSink, Speaker, SpeechOutput, Synthesizer};
