//! Message and conversation log domain types.
//!
//! These are the value objects that flow through the whole workspace:
//! a chat loop appends messages to a log → the trimmer cuts the log down to
//! a token budget → the trimmed log is handed to the model invocation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Well-known role labels. Roles are free-form strings; these are only
/// the ones the chat loops use.
pub mod roles {
    pub const HUMAN: &str = "human";
    pub const SYSTEM: &str = "system";
    pub const ASSISTANT: &str = "assistant";
}

/// A single entry in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Who is speaking ("human", "system", "assistant", or anything else)
    pub role: String,

    /// The text content
    pub content: String,
}

impl Message {
    /// Create a message with an arbitrary role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a new human message.
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(roles::HUMAN, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(roles::SYSTEM, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(roles::ASSISTANT, content)
    }

    /// Build a message from one element of a JSON log.
    ///
    /// Accepts `{"role": "...", "content": "..."}` or a `["role", "content"]`
    /// pair. Role and content must both be JSON strings; nothing is coerced.
    /// `index` only feeds the error message.
    pub fn from_value(index: usize, value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let role = string_field(index, "role", map.get("role"))?;
                let content = string_field(index, "content", map.get("content"))?;
                Ok(Self::new(role, content))
            }
            Value::Array(pair) if pair.len() == 2 => {
                let role = string_field(index, "role", pair.first())?;
                let content = string_field(index, "content", pair.get(1))?;
                Ok(Self::new(role, content))
            }
            Value::Array(items) => Err(Error::InvalidArgument(format!(
                "message {index}: expected a [role, content] pair, got {} elements",
                items.len()
            ))),
            other => Err(Error::InvalidArgument(format!(
                "message {index}: expected an object or a [role, content] pair, got {}",
                value_kind(other)
            ))),
        }
    }
}

impl<R: Into<String>, C: Into<String>> From<(R, C)> for Message {
    fn from((role, content): (R, C)) -> Self {
        Self::new(role, content)
    }
}

fn string_field<'a>(index: usize, field: &str, value: Option<&'a Value>) -> Result<&'a str> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(Error::InvalidArgument(format!(
            "message {index}: `{field}` must be a string, got {}",
            value_kind(other)
        ))),
        None => Err(Error::InvalidArgument(format!(
            "message {index}: missing `{field}`"
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A chronological (oldest first) sequence of messages.
///
/// Serializes as a plain JSON array of `{role, content}` objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog {
    /// Ordered messages, oldest first
    pub messages: Vec<Message>,
}

impl ConversationLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the newest end.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    /// Parse a log from JSON text.
    ///
    /// The top level must be an array; see [`Message::from_value`] for the
    /// accepted element shapes. Malformed JSON is a serialization error,
    /// well-formed JSON of the wrong shape is an invalid argument.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "conversation log must be a JSON array, got {}",
                    value_kind(&other)
                )));
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| Message::from_value(index, item))
            .collect::<Result<Vec<_>>>()
            .map(Self::from)
    }

    /// Serialize as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Vec<Message>> for ConversationLog {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl FromIterator<Message> for ConversationLog {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[Message]> for ConversationLog {
    fn as_ref(&self) -> &[Message] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl IntoIterator for ConversationLog {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}
