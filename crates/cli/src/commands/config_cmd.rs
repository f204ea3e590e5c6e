//! `taleweaver config`: configuration management commands.

use std::path::Path;
use taleweaver_config::{AppConfig, ConfigError};

/// Load the effective configuration, from `path` when one was given on the
/// command line.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_with_env(path, |key| std::env::var(key).ok()),
        None => AppConfig::load(),
    }
}

pub fn validate(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match load(path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let warnings = config.warnings();
            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Budget:    {} tokens", config.history.max_tokens);
            println!("   Preview:   {} chars", config.debug.preview_chars);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load(path).map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", config.to_toml());
    Ok(())
}

pub fn init() {
    println!("# Save as {}", AppConfig::config_path().display());
    println!("{}", AppConfig::default_toml());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[debug]\npreview_chars = 12\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.debug.preview_chars, 12);
    }

    #[test]
    fn load_broken_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[debug]\npreview_chars = 0\n").unwrap();

        assert!(matches!(
            load(Some(&path)),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn non_positive_budget_loads_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\nmax_tokens = 0\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.warnings().len(), 1);
    }
}
