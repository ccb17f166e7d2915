//! Conversation transcript shared between the dialogue layer and the
//! language collaborator

use chrono::{DateTime, Utc};

/// Who said an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Human,
    Robot,
}

impl Speaker {
    /// Transcript tag. The language prompts key on these exact strings.
    pub fn tag(&self) -> &'static str {
        match self {
            Speaker::Human => "Human",
            Speaker::Robot => "AI",
        }
    }
}

/// One logged turn.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Ordered, speaker-tagged transcript of the current conversation.
/// Append-only while a conversation runs; cleared on disengagement.
#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: Vec<Utterance>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.entries.push(Utterance {
            speaker,
            text: text.into(),
            at: Utc::now(),
        });
    }

    /// Drop the most recent turn. Used when a turn went unanswered and the
    /// robot apologizes instead.
    pub fn drop_last(&mut self) {
        self.entries.pop();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }

    /// Render the transcript as `"Human: ..."` / `"AI: ..."` lines, the form
    /// the language prompts consume.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|u| format!("{}: {}", u.speaker.tag(), u.text))
            .collect()
    }

    /// Only what the human said, untagged. Name extraction reads these.
    pub fn human_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|u| u.speaker == Speaker::Human)
            .map(|u| u.text.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lines() {
        let mut log = ConversationLog::new();
        log.record(Speaker::Robot, "Hi there!");
        log.record(Speaker::Human, "Hello");

        assert_eq!(log.len(), 2);
        assert_eq!(log.lines(), vec!["AI: Hi there!", "Human: Hello"]);
    }

    #[test]
    fn test_drop_last() {
        let mut log = ConversationLog::new();
        log.record(Speaker::Human, "unanswered question");
        log.drop_last();
        assert!(log.is_empty());

        // Dropping from an empty log is a no-op
        log.drop_last();
        assert!(log.is_empty());
    }

    #[test]
    fn test_human_lines_filters_robot_turns() {
        let mut log = ConversationLog::new();
        log.record(Speaker::Robot, "Hi, what's your name?");
        log.record(Speaker::Human, "I'm Sam");
        log.record(Speaker::Robot, "Nice to meet you");

        assert_eq!(log.human_lines(), vec!["I'm Sam"]);
    }

    #[test]
    fn test_clear() {
        let mut log = ConversationLog::new();
        log.record(Speaker::Human, "hello");
        log.clear();
        assert!(log.is_empty());
    }
}
