//! `taleweaver replay`: feed a log through a budgeted window one message at
//! a time and show how the window evolves.

use std::path::Path;
use taleweaver_config::AppConfig;
use taleweaver_core::ConversationLog;
use taleweaver_memory::WindowedHistory;

use crate::input;

/// Window state right after one message was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    pub role: String,
    pub window_messages: usize,
    pub window_tokens: usize,
}

pub fn run(
    config: &AppConfig,
    input: Option<&Path>,
    max_tokens: Option<i64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let log = input::read_log(input)?;
    let budget = max_tokens.unwrap_or(config.history.max_tokens);
    let total = log.len();

    println!("🔁 Replaying {total} messages with a {budget}-token window");
    println!("─────────────────────────────────────");

    let (steps, history) = replay(log, budget);
    for (i, step) in steps.iter().enumerate() {
        println!(
            "  {:>3}. {:<10} window: {:>3} msgs / {:>6} tokens",
            i + 1,
            step.role,
            step.window_messages,
            step.window_tokens
        );
    }

    println!();
    println!(
        "  Final window: {} of {} messages ({} tokens)",
        history.window().len(),
        history.complete().len(),
        history.window_tokens()
    );

    Ok(())
}

pub fn replay(log: ConversationLog, budget: i64) -> (Vec<ReplayStep>, WindowedHistory) {
    let mut history = WindowedHistory::new(budget);
    let steps = log
        .into_iter()
        .map(|message| {
            let role = message.role.clone();
            let stats = history.record(message);
            ReplayStep {
                role,
                window_messages: stats.items_included,
                window_tokens: stats.tokens_used,
            }
        })
        .collect();
    (steps, history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taleweaver_core::Message;

    #[test]
    fn window_slides_as_messages_arrive() {
        let log: ConversationLog = vec![
            Message::human("one"),          // 6
            Message::system("two three"),   // 7
            Message::human("Hello, world!"), // 9
        ]
        .into();

        let (steps, history) = replay(log, 16);
        let windows: Vec<usize> = steps.iter().map(|s| s.window_messages).collect();
        assert_eq!(windows, vec![1, 2, 2]);
        assert_eq!(steps[2].window_tokens, 16);
        assert_eq!(history.complete().len(), 3);
    }

    #[test]
    fn empty_log_replays_nothing() {
        let (steps, history) = replay(ConversationLog::new(), 100);
        assert!(steps.is_empty());
        assert!(history.window().is_empty());
    }
}
