//! Token-budget trimming of chat history.
//!
//! The trimmer always anchors at the newest message and grows backward,
//! keeping messages while the running total stays within budget. The walk
//! stops at the first message that does not fit, so the result is a
//! contiguous suffix of the input in chronological order.
//!
//! # Determinism
//!
//! Trimming is a pure function of the messages and the budget: no clock, no
//! randomness, no shared state. The input slice is never mutated.

use serde::{Deserialize, Serialize};
use taleweaver_core::Message;

use crate::token;

/// Default history budget used by the chat loops.
pub const DEFAULT_MAX_TOKENS: i64 = 32_000;

/// Number of trailing messages of `history` that fit in `max_tokens`.
///
/// The trimmed history is `history[history.len() - k..]`.
pub fn suffix_len(history: &[Message], max_tokens: i64) -> usize {
    select_suffix(history, max_tokens).0
}

/// Trim `history` to the longest suffix whose estimated cost fits
/// `max_tokens`.
///
/// Returns an empty vector when the budget is zero or negative, when the
/// history is empty, or when the newest message alone exceeds the budget.
/// The boundary is inclusive: a suffix costing exactly `max_tokens` is kept.
pub fn trim_chat_history(history: &[Message], max_tokens: i64) -> Vec<Message> {
    let keep = suffix_len(history, max_tokens);
    history[history.len() - keep..].to_vec()
}

/// Returns (kept message count, tokens used by the kept messages).
fn select_suffix(history: &[Message], max_tokens: i64) -> (usize, usize) {
    if max_tokens <= 0 {
        return (0, 0);
    }
    let Some(newest) = history.last() else {
        return (0, 0);
    };

    let budget = usize::try_from(max_tokens).unwrap_or(usize::MAX);
    if token::estimate_message(newest) > budget {
        return (0, 0);
    }

    let mut used = 0usize;
    let mut kept = 0usize;
    for message in history.iter().rev() {
        match used.checked_add(token::estimate_message(message)) {
            Some(total) if total <= budget => {
                used = total;
                kept += 1;
            }
            _ => break,
        }
    }

    (kept, used)
}

// ── Stats ─────────────────────────────────────────────────────────────────

/// Information about messages dropped during trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropInfo {
    /// Number of messages dropped.
    pub items_dropped: usize,
    /// Estimated tokens of dropped content.
    pub tokens_dropped: usize,
    /// Reason for dropping.
    pub reason: String,
}

/// Statistics for a single trim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimStats {
    /// Configured token budget.
    pub budget: i64,
    /// Tokens consumed by the kept messages.
    pub tokens_used: usize,
    /// Messages kept.
    pub items_included: usize,
    /// Messages before trimming.
    pub items_total: usize,
    /// Present when at least one message was dropped.
    pub dropped: Option<DropInfo>,
}

/// Trimmed messages plus what it took to get there.
#[derive(Debug, Clone)]
pub struct TrimOutcome {
    pub messages: Vec<Message>,
    pub stats: TrimStats,
}

// ── Trimmer ───────────────────────────────────────────────────────────────

/// A history trimmer bound to one budget. Stateless, so create one and reuse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryTrimmer {
    max_tokens: i64,
}

impl HistoryTrimmer {
    /// Create a trimmer with the given token budget.
    pub fn new(max_tokens: i64) -> Self {
        Self { max_tokens }
    }

    pub fn max_tokens(&self) -> i64 {
        self.max_tokens
    }

    /// Trim without collecting stats.
    pub fn trim(&self, history: &[Message]) -> Vec<Message> {
        trim_chat_history(history, self.max_tokens)
    }

    /// Trim and report how many messages and tokens were kept and dropped.
    pub fn trim_with_stats(&self, history: &[Message]) -> TrimOutcome {
        let (kept, used) = select_suffix(history, self.max_tokens);
        let messages = history[history.len() - kept..].to_vec();
        let dropped_count = history.len() - kept;

        let dropped = (dropped_count > 0).then(|| {
            let tokens_dropped = token::estimate_log_tokens(&history[..dropped_count]);
            let reason = if self.max_tokens <= 0 {
                "Budget is not positive"
            } else if kept == 0 {
                "Newest message alone exceeds budget"
            } else {
                "Oldest messages dropped (budget exhausted)"
            };
            DropInfo {
                items_dropped: dropped_count,
                tokens_dropped,
                reason: reason.into(),
            }
        });

        if let Some(info) = &dropped {
            tracing::debug!(
                budget = self.max_tokens,
                kept,
                dropped = info.items_dropped,
                tokens_used = used,
                "Trimmed chat history: {}",
                info.reason
            );
        }

        TrimOutcome {
            messages,
            stats: TrimStats {
                budget: self.max_tokens,
                tokens_used: used,
                items_included: kept,
                items_total: history.len(),
                dropped,
            },
        }
    }
}

impl Default for HistoryTrimmer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
