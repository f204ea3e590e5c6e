//! Configuration loading, validation, and management for Taleweaver.
//!
//! Loads configuration from `~/.taleweaver/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taleweaver_context::{DEFAULT_MAX_TOKENS, DEFAULT_PREVIEW_CHARS};

/// Environment variable overriding `history.max_tokens`.
pub const ENV_MAX_TOKENS: &str = "TALEWEAVER_MAX_TOKENS";
/// Environment variable overriding `debug.preview_chars`.
pub const ENV_PREVIEW_CHARS: &str = "TALEWEAVER_PREVIEW_CHARS";

/// The root configuration structure.
///
/// Maps directly to `~/.taleweaver/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat history budget
    #[serde(default)]
    pub history: HistoryConfig,

    /// Token diagnostics output
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum estimated tokens of history forwarded to the model.
    /// Zero or negative keeps nothing.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
}

fn default_max_tokens() -> i64 {
    DEFAULT_MAX_TOKENS
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Characters shown per message line in token reports
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.taleweaver/config.toml).
    ///
    /// Environment overrides win over the file:
    /// - `TALEWEAVER_MAX_TOKENS`
    /// - `TALEWEAVER_PREVIEW_CHARS`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path(), |key| std::env::var(key).ok())
    }

    /// Load from `path`, then apply overrides looked up through `env`.
    pub fn load_with_env(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::parse_file(path)?;
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse `path` without validating.
    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = env(ENV_MAX_TOKENS) {
            self.history.max_tokens = parse_env(ENV_MAX_TOKENS, &raw)?;
        }
        if let Some(raw) = env(ENV_PREVIEW_CHARS) {
            self.debug.preview_chars = parse_env(ENV_PREVIEW_CHARS, &raw)?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".taleweaver")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.debug.preview_chars == 0 {
            return Err(ConfigError::ValidationError(
                "debug.preview_chars must be > 0".into(),
            ));
        }

        for warning in self.warnings() {
            tracing::warn!("{warning}");
        }

        Ok(())
    }

    /// Settings that load fine but are probably not what the user wants.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.history.max_tokens <= 0 {
            warnings.push("history.max_tokens is not positive; every trim keeps nothing");
        }
        warnings
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        Self::default().to_toml()
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("{key} has an invalid value: {raw:?}")))
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.history.max_tokens, 32_000);
        assert_eq!(config.debug.preview_chars, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig {
            history: HistoryConfig { max_tokens: 8000 },
            ..AppConfig::default()
        };
        let parsed: AppConfig = toml::from_str(&config.to_toml()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str("[history]\nmax_tokens = 8000\n").unwrap();
        assert_eq!(config.history.max_tokens, 8000);
        assert_eq!(config.debug.preview_chars, 100);
    }

    #[test]
    fn zero_preview_chars_rejected() {
        let config = AppConfig {
            debug: DebugConfig { preview_chars: 0 },
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn non_positive_budget_is_allowed() {
        let config = AppConfig {
            history: HistoryConfig { max_tokens: -1 },
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.warnings().len(), 1);
    }

    #[test]
    fn default_config_has_no_warnings() {
        assert!(AppConfig::default().warnings().is_empty());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\nmax_tokens = 8000\n\n[debug]\npreview_chars = 40\n")
            .unwrap();

        let config = AppConfig::load_with_env(&path, no_env).unwrap();
        assert_eq!(config.history.max_tokens, 8000);
        assert_eq!(config.debug.preview_chars, 40);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history\nmax_tokens = ").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\nmax_tokens = \"lots\"\n").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\nmax_tokens = 8000\n").unwrap();

        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_MAX_TOKENS, " 500 "), (ENV_PREVIEW_CHARS, "20")]);
        let config =
            AppConfig::load_with_env(&path, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.history.max_tokens, 500);
        assert_eq!(config.debug.preview_chars, 20);
    }

    #[test]
    fn env_repairs_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[debug]\npreview_chars = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ValidationError(_))
        ));

        let config = AppConfig::load_with_env(&path, |key| {
            (key == ENV_PREVIEW_CHARS).then(|| "20".to_string())
        })
        .unwrap();
        assert_eq!(config.debug.preview_chars, 20);
    }

    #[test]
    fn unparsable_env_is_validation_error() {
        let err = AppConfig::load_with_env(Path::new("/nonexistent/config.toml"), |key| {
            (key == ENV_MAX_TOKENS).then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains(ENV_MAX_TOKENS)));
    }

    #[test]
    fn env_cannot_bypass_validation() {
        let err = AppConfig::load_with_env(Path::new("/nonexistent/config.toml"), |key| {
            (key == ENV_PREVIEW_CHARS).then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("[history]"));
        assert!(toml_str.contains("max_tokens = 32000"));
        assert!(toml_str.contains("preview_chars = 100"));
    }
}
