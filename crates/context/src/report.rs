//! Token diagnostics for a message list: the total estimate plus one
//! clipped line per message, for debug printing next to a chat loop.

use std::fmt;

use serde::Serialize;
use taleweaver_core::Message;

use crate::token;

/// Default number of characters shown per message line.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// One message in a [`TokenReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub role: String,
    pub tokens: usize,
    /// `"(<tokens>) <content>"`, clipped and flattened to one line.
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenReport {
    pub total_tokens: usize,
    pub entries: Vec<ReportEntry>,
}

impl TokenReport {
    pub fn from_messages(messages: &[Message], preview_chars: usize) -> Self {
        let entries: Vec<ReportEntry> = messages
            .iter()
            .map(|message| {
                let tokens = token::estimate_message(message);
                ReportEntry {
                    role: message.role.clone(),
                    tokens,
                    preview: preview_line(&format!("({tokens}) {}", message.content), preview_chars),
                }
            })
            .collect();

        Self {
            total_tokens: entries.iter().map(|e| e.tokens).sum(),
            entries,
        }
    }
}

/// Clip to `max_chars` characters, then flatten newlines to `" | "`.
fn preview_line(line: &str, max_chars: usize) -> String {
    let clipped: String = line.chars().take(max_chars).collect();
    clipped.replace('\n', " | ")
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- DEBUG ---")?;
        writeln!(f, "{} tokens in message", self.total_tokens)?;
        for entry in &self.entries {
            writeln!(f, "[{}]", entry.preview)?;
        }
        write!(f, "-------------")
    }
}
