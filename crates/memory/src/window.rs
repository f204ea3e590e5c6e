//! Complete transcript plus a budgeted window, as kept by a RAG chat loop.
//!
//! The complete log grows without bound (raw material for long-term memory);
//! the window is re-trimmed after every turn and is what gets sent to the
//! model.

use taleweaver_context::{HistoryTrimmer, TrimStats, estimate_log_tokens};
use taleweaver_core::Message;

#[derive(Debug, Clone)]
pub struct WindowedHistory {
    complete: Vec<Message>,
    window: Vec<Message>,
    trimmer: HistoryTrimmer,
}

impl WindowedHistory {
    pub fn new(max_tokens: i64) -> Self {
        Self {
            complete: Vec::new(),
            window: Vec::new(),
            trimmer: HistoryTrimmer::new(max_tokens),
        }
    }

    /// Record one question/answer exchange and re-trim the window.
    pub fn record_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) -> TrimStats {
        self.extend([Message::human(question), Message::assistant(answer)])
    }

    /// Record a single message and re-trim the window.
    pub fn record(&mut self, message: Message) -> TrimStats {
        self.extend([message])
    }

    fn extend<const N: usize>(&mut self, messages: [Message; N]) -> TrimStats {
        self.complete.extend(messages.iter().cloned());
        self.window.extend(messages);

        let outcome = self.trimmer.trim_with_stats(&self.window);
        self.window = outcome.messages;
        outcome.stats
    }

    /// Everything ever recorded.
    pub fn complete(&self) -> &[Message] {
        &self.complete
    }

    /// The newest messages that fit the budget.
    pub fn window(&self) -> &[Message] {
        &self.window
    }

    pub fn window_tokens(&self) -> usize {
        estimate_log_tokens(&self.window)
    }

    pub fn max_tokens(&self) -> i64 {
        self.trimmer.max_tokens()
    }

    /// `[system] ++ window ++ extra`, ready for a model call.
    pub fn prompt(&self, system: Message, extra: impl IntoIterator<Item = Message>) -> Vec<Message> {
        std::iter::once(system)
            .chain(self.window.iter().cloned())
            .chain(extra)
            .collect()
    }
}
