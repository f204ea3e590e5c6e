//! `taleweaver estimate`: token estimates for a text or a whole log.

use std::path::Path;
use taleweaver_config::AppConfig;
use taleweaver_context::{TokenReport, estimate_text_tokens};

use crate::input;

pub fn run(
    config: &AppConfig,
    text: Option<&str>,
    input: Option<&Path>,
    preview_chars: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(text) = text {
        println!("{}", estimate_text_tokens(text));
        return Ok(());
    }

    let preview_chars = preview_chars.unwrap_or(config.debug.preview_chars);
    if preview_chars == 0 {
        return Err("--preview-chars must be > 0".into());
    }

    let log = input::read_log(input)?;
    println!("{}", TokenReport::from_messages(log.as_slice(), preview_chars));
    Ok(())
}
