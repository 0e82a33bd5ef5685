//! Configuration management for chatdeck.
//!
//! Loads configuration from ${CHATDECK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::responder::PLACEHOLDER_REPLY;

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for chatdeck configuration and data directories.
    //!
    //! CHATDECK_HOME resolution order:
    //! 1. CHATDECK_HOME environment variable (if set)
    //! 2. ~/.config/chatdeck (default)
    //! 3. ./.chatdeck when no home directory can be found

    use std::path::PathBuf;

    /// Returns the chatdeck home directory.
    pub fn chatdeck_home() -> PathBuf {
        if let Ok(home) = std::env::var("CHATDECK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".chatdeck"),
            |h| h.join(".config").join("chatdeck"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        chatdeck_home().join("config.toml")
    }

    /// Returns the default log directory.
    pub fn logs_dir() -> PathBuf {
        chatdeck_home().join("logs")
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs at all.
    pub enabled: bool,
    /// Default filter directive (overridden by RUST_LOG).
    pub level: String,
    /// Log directory (defaults to ${CHATDECK_HOME}/logs).
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn effective_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(paths::logs_dir)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name used in the landing greeting.
    pub user_name: String,

    /// Delay before the assistant reply arrives, in milliseconds.
    pub reply_latency_ms: u64,

    /// Duration of the prompt refresh indicator, in milliseconds.
    pub refresh_delay_ms: u64,

    /// Text of the assistant reply.
    pub placeholder_reply: String,

    /// Denominator of the composer character counter (display only).
    pub draft_display_limit: usize,

    /// Start with the sidebar expanded.
    pub sidebar_expanded: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: Self::DEFAULT_USER_NAME.to_string(),
            reply_latency_ms: Self::DEFAULT_REPLY_LATENCY_MS,
            refresh_delay_ms: Self::DEFAULT_REFRESH_DELAY_MS,
            placeholder_reply: PLACEHOLDER_REPLY.to_string(),
            draft_display_limit: Self::DEFAULT_DRAFT_DISPLAY_LIMIT,
            sidebar_expanded: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_USER_NAME: &str = "David";
    const DEFAULT_REPLY_LATENCY_MS: u64 = 2000;
    const DEFAULT_REFRESH_DELAY_MS: u64 = 1000;
    const DEFAULT_DRAFT_DISPLAY_LIMIT: usize = 1000;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn reply_latency(&self) -> Duration {
        Duration::from_millis(self.reply_latency_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reply_latency(), Duration::from_secs(2));
        assert_eq!(config.refresh_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "user_name = \"Ada\"\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.user_name, "Ada");
        assert_eq!(config.reply_latency_ms, 2000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "reply_latency_ms = \"soon\"").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("reply_latency_ms = 2000"));
        let parsed = Config::load_from(&config_path).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_log_dir_override() {
        let logging = LoggingConfig {
            dir: Some(PathBuf::from("/tmp/chatdeck-logs")),
            ..LoggingConfig::default()
        };
        assert_eq!(logging.effective_dir(), PathBuf::from("/tmp/chatdeck-logs"));
    }
}
