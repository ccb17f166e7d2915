//! amica-brain: the engagement and dialogue state machines
//!
//! A single synchronous `update` per perception tick drives everything. The
//! tick never blocks on network or hardware: speech playback, response
//! generation, and name extraction all run on spawned tasks that report back
//! through polled slots. Cancellation is soft: a superseded response is not
//! aborted, its result is simply dead on arrival.

pub mod config;
pub mod dialogue;
pub mod engagement;

pub use config::BrainConfig;
pub use dialogue::{DialogueTurnMachine, TurnEvent, TurnState};
pub use engagement::{BrainUpdate, EngagementMachine, EngagementState, NewIdentity, Signal};
