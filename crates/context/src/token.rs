//! Token estimation utilities.
//!
//! Counts every maximal run of word characters (Unicode letters, digits,
//! underscore) plus every single character that is neither whitespace nor a
//! word character (punctuation, symbols, emoji). This over-approximates BPE
//! tokenizers on prose and needs no model vocabulary, so the count is the
//! same on every machine.

use regex::Regex;
use std::sync::OnceLock;
use taleweaver_core::Message;

/// Fixed per-message cost for role name and delimiter tokens.
pub const MESSAGE_OVERHEAD_TOKENS: usize = 4;

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| Regex::new(r"\w+|[^\s\w]").expect("Failed to compile token regex"))
}

/// Estimate the token count for a string.
pub fn estimate_text_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    token_regex().find_iter(text).count()
}

/// Estimate tokens for a single message including per-message overhead.
///
/// Always at least [`MESSAGE_OVERHEAD_TOKENS`].
pub fn estimate_message_tokens(role: &str, content: &str) -> usize {
    MESSAGE_OVERHEAD_TOKENS + estimate_text_tokens(role) + estimate_text_tokens(content)
}

/// [`estimate_message_tokens`] for a [`Message`].
pub fn estimate_message(message: &Message) -> usize {
    estimate_message_tokens(&message.role, &message.content)
}

/// Estimate tokens for a slice of messages.
pub fn estimate_log_tokens(messages: &[Message]) -> usize {
    messages.iter().map(estimate_message).sum()
}
