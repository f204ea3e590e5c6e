//! Per-agent conversation memory.
//!
//! Holds the ordered history one agent has seen, and hands it back either
//! merged with the next input, flattened into a transcript, or trimmed to a
//! token budget.

use chrono::{DateTime, Utc};
use taleweaver_context::trim_chat_history;
use taleweaver_core::Message;

/// An ordered, append-mostly chat history.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append the input and/or output of one exchange, input first.
    pub fn save(&mut self, input: Option<Message>, output: Option<Message>) {
        let before = self.messages.len();
        self.messages.extend(input);
        self.messages.extend(output);
        if self.messages.len() != before {
            self.touch();
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Pop the newest message.
    pub fn remove_last(&mut self) -> Option<Message> {
        let popped = self.messages.pop();
        if popped.is_some() {
            self.touch();
        }
        popped
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.touch();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Stored history followed by `input`.
    pub fn merged_with(&self, input: &[Message]) -> Vec<Message> {
        self.messages.iter().chain(input).cloned().collect()
    }

    /// Flatten the history into a `"Prefix: content"` transcript, one line
    /// per message.
    pub fn joined(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", speaker_prefix(&m.role), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The stored history cut down to `max_tokens`.
    pub fn trimmed(&self, max_tokens: i64) -> Vec<Message> {
        trim_chat_history(&self.messages, max_tokens)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Message>> for ConversationMemory {
    fn from(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::new()
        }
    }
}

fn speaker_prefix(role: &str) -> &str {
    match role {
        "human" | "user" => "Human",
        "assistant" | "ai" => "AI",
        "system" => "System",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_appends_input_then_output() {
        let mut memory = ConversationMemory::new();
        memory.save(
            Some(Message::human("Who took the amulet?")),
            Some(Message::assistant("The butler, perhaps.")),
        );
        memory.save(None, Some(Message::assistant("Or the cook.")));
        memory.save(None, None);

        assert_eq!(memory.len(), 3);
        assert_eq!(memory.messages()[0].role, "human");
        assert_eq!(memory.last(), Some(&Message::assistant("Or the cook.")));
    }

    #[test]
    fn remove_last_pops_newest() {
        let mut memory = ConversationMemory::from(vec![Message::human("a"), Message::human("b")]);
        assert_eq!(memory.remove_last(), Some(Message::human("b")));
        assert_eq!(memory.remove_last(), Some(Message::human("a")));
        assert_eq!(memory.remove_last(), None);
        assert!(memory.is_empty());
    }

    #[test]
    fn clear_empties_history() {
        let mut memory = ConversationMemory::from(vec![Message::human("a")]);
        memory.clear();
        assert!(memory.is_empty());
        assert!(memory.last().is_none());
    }

    #[test]
    fn merged_with_puts_history_first() {
        let memory = ConversationMemory::from(vec![Message::human("old")]);
        let merged = memory.merged_with(&[Message::human("new")]);
        assert_eq!(merged, vec![Message::human("old"), Message::human("new")]);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn joined_uses_speaker_prefixes() {
        let memory = ConversationMemory::from(vec![
            Message::system("Stay in character."),
            Message::human("Where were you?"),
            Message::assistant("In the library."),
            Message::new("detective", "Noted."),
        ]);
        assert_eq!(
            memory.joined(),
            "System: Stay in character.\nHuman: Where were you?\nAI: In the library.\ndetective: Noted."
        );
        assert_eq!(ConversationMemory::new().joined(), "");
    }

    #[test]
    fn trimmed_keeps_newest_suffix() {
        let memory = ConversationMemory::from(vec![
            Message::human("one"),
            Message::system("two three"),
            Message::human("Hello, world!"),
        ]);
        // 7 + 9 tokens for the last two messages.
        assert_eq!(memory.trimmed(16), memory.messages()[1..].to_vec());
        assert!(memory.trimmed(0).is_empty());
    }

    #[test]
    fn mutations_touch_updated_at() {
        let mut memory = ConversationMemory::new();
        let created = memory.created_at();
        memory.push(Message::human("hi"));
        assert!(memory.updated_at() >= created);
    }
}
