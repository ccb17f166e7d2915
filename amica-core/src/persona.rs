//! The robot's self-identity

use serde::{Deserialize, Serialize};

/// Who the robot presents itself as. The greeting uses the name; the
/// conversation prompt preamble uses the whole description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    /// Name the robot introduces itself with and the transcript scrubber
    /// strips from replies.
    pub name: String,
    /// Short third-person background woven into the conversation prompt.
    pub background: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Amica".to_string(),
            background: "who was created by the Amica team. Amica likes to talk to people, \
                         is helpful, creative, clever, and very friendly."
                .to_string(),
        }
    }
}

impl Persona {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Persona name must not be empty".to_string());
        }

        Ok(())
    }
}
