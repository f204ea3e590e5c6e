//! Reading conversation logs from a file or stdin.

use std::io::Read;
use std::path::Path;
use taleweaver_core::{ConversationLog, Error, Result};

/// Read a JSON conversation log from `path`, or from stdin when `path` is
/// `None` or `-`.
pub fn read_log(path: Option<&Path>) -> Result<ConversationLog> {
    let raw = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {e}", path.display()),
            ))
        })?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let log = ConversationLog::from_json(&raw)?;
    tracing::debug!(messages = log.len(), "Loaded conversation log");
    Ok(log)
}
