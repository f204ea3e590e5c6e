//! Token estimation and token-budget trimming of chat history.
//!
//! Chat loops keep appending turns to their history; before each model call
//! the history is cut down to the newest messages that fit a token budget.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`token`] | Cheap, deterministic token estimates for text and messages |
//! | [`trimmer`] | Longest-suffix selection under a budget, with drop stats |
//! | [`report`] | Per-message token diagnostics for debug output |

pub mod report;
pub mod token;
pub mod trimmer;

pub use report::{DEFAULT_PREVIEW_CHARS, ReportEntry, TokenReport};
pub use token::{
    MESSAGE_OVERHEAD_TOKENS, estimate_log_tokens, estimate_message, estimate_message_tokens,
    estimate_text_tokens,
};
pub use trimmer::{
    DEFAULT_MAX_TOKENS, DropInfo, HistoryTrimmer, TrimOutcome, TrimStats, suffix_len,
    trim_chat_history,
};
