//! `taleweaver trim`: cut a conversation log down to a token budget.

use std::path::Path;
use taleweaver_config::AppConfig;
use taleweaver_context::{HistoryTrimmer, TrimStats};
use taleweaver_core::ConversationLog;

use crate::input;

pub fn run(
    config: &AppConfig,
    input: Option<&Path>,
    max_tokens: Option<i64>,
    stats: bool,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log = input::read_log(input)?;
    let budget = max_tokens.unwrap_or(config.history.max_tokens);

    let outcome = HistoryTrimmer::new(budget).trim_with_stats(log.as_slice());
    let trimmed = ConversationLog::from(outcome.messages);

    let json = if pretty {
        trimmed.to_json_pretty()?
    } else {
        trimmed.to_json()?
    };
    println!("{json}");

    if stats {
        eprintln!("{}", render_stats(&outcome.stats));
    }

    Ok(())
}

pub fn render_stats(stats: &TrimStats) -> String {
    let mut lines = vec![
        "✂️  Trim Summary".to_string(),
        "─────────────────────────────────────".to_string(),
        format!("  Budget:    {} tokens", stats.budget),
        format!("  Used:      {} tokens", stats.tokens_used),
        format!("  Kept:      {} / {} messages", stats.items_included, stats.items_total),
    ];

    match &stats.dropped {
        Some(info) => lines.push(format!(
            "  Dropped:   {} messages ({} tokens): {}",
            info.items_dropped, info.tokens_dropped, info.reason
        )),
        None => lines.push("  Dropped:   nothing".to_string()),
    }

    lines.join("\n")
}
