//! amica-llm: the language collaborator behind the dialogue machine
//!
//! Two operations reach the model: generating the robot's next conversational
//! reply, and extracting the partner's name from a finished conversation so
//! an unknown face can be registered. Both go through the `LanguageModel`
//! contract; the bundled provider speaks the OpenAI-compatible
//! chat-completions wire format.

pub mod config;
pub mod error;
pub mod prompt;
pub mod provider;

pub use config::LanguageConfig;
pub use error::{LanguageError, Result};
pub use provider::ChatCompletionProvider;

use async_trait::async_trait;

/// The language contract. `converse` is always invoked from a spawned task
/// (the dialogue machine must never block its polling tick on the network);
/// `extract_name` likewise runs off the tick path at disengagement.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Produce the robot's next reply given the speaker-tagged transcript.
    async fn converse(&self, lines: &[String]) -> Result<String>;

    /// Try to extract the conversation partner's name from the transcript.
    /// `Ok(None)` when the model finds no name.
    async fn extract_name(&self, lines: &[String]) -> Result<Option<String>>;
}
