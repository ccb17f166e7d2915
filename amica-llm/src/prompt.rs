//! Prompt construction and reply scrubbing

use amica_core::Persona;

const NAME_EXTRACTION_PREAMBLE: &str = "Extract the name from this conversation:\n\
     If there is no name found, I will respond with \"Unknown\".\n\n";

/// Conversation prompt: persona preamble plus the trailing `max_history`
/// transcript lines. Older lines fall off to bound token cost.
pub fn conversation_prompt(persona: &Persona, lines: &[String], max_history: usize) -> String {
    let start = lines.len().saturating_sub(max_history);
    let window = &lines[start..];

    format!(
        "The following is a conversation with an AI named {} {}\n\n{}\n",
        persona.name,
        persona.background,
        window.join("\n")
    )
}

/// Stop sequences keeping the model from continuing the dialogue on both
/// sides of the exchange.
pub fn conversation_stops() -> Vec<String> {
    vec![" Human:".to_string(), " AI:".to_string()]
}

/// The model sometimes prefixes its reply with a speaker tag of its own;
/// strip tags and newlines down to the bare sentence to speak.
pub fn scrub_reply(raw: &str, robot_name: &str) -> String {
    raw.replace("AI:", "")
        .replace("Human:", "")
        .replace(&format!("{}:", robot_name), "")
        .replace('\n', "")
        .trim()
        .to_string()
}

/// Name-extraction prompt over the human side of a tagged transcript.
pub fn name_extraction_prompt(lines: &[String]) -> String {
    let human: Vec<String> = lines
        .iter()
        .filter(|line| line.starts_with("Human: "))
        .map(|line| line.replace("Human: ", ""))
        .collect();

    format!("{}{}\n\nName: ", NAME_EXTRACTION_PREAMBLE, human.join("\n"))
}

/// Interpret a name-extraction answer. "Unknown" (in any casing) and empty
/// answers mean no name; anything else is normalized to lowercase.
pub fn parse_extracted_name(raw: &str) -> Option<String> {
    let name = scrub_reply(raw, "").to_lowercase();

    if name.is_empty() || name.contains("unknown") {
        return None;
    }

    Some(name)
}
