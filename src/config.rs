//! Runtime configuration.
//!
//! Settings come from an optional TOML file; every section and field falls
//! back to its default. The bot token is never read from the file, only from
//! the `TASKBOT_TOKEN` environment variable (a `.env` file is honoured).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TOKEN_ENV: &str = "TASKBOT_TOKEN";
pub const DEFAULT_CONFIG_PATH: &str = "taskbot.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Missing required environment variable: {0}")]
    MissingToken(&'static str),
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Telegram,
    Console,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub transport: TransportConfig,
    pub cache: CacheConfig,
    pub sessions: SessionConfig,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub bot_token: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TransportConfig {
    pub kind: TransportKind,
    pub api_url: String,
    pub poll_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub console_user_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_seconds: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub max_sessions: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
    pub level: String,
    pub stdout: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::Telegram,
            api_url: "https://api.telegram.org".to_string(),
            poll_timeout_seconds: 30,
            request_timeout_seconds: 40,
            max_retries: 3,
            console_user_id: 1,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            ttl_seconds: 3600,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_sessions: 10_000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("bot.log")),
            level: "info".to_string(),
            stdout: true,
        }
    }
}

impl Config {
    /// Reads `path` (defaults when it does not exist) and picks up the token
    /// from the environment. Call [`Config::validated`] once overrides are applied.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };

        Ok(config.with_token(std::env::var(TOKEN_ENV).ok()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.bot_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.transport.kind == TransportKind::Telegram && self.bot_token.is_none() {
            return Err(ConfigError::MissingToken(TOKEN_ENV));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "cache.capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::Invalid {
                field: "sessions.max_sessions",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.transport.request_timeout_seconds <= self.transport.poll_timeout_seconds {
            return Err(ConfigError::Invalid {
                field: "transport.request_timeout_seconds",
                reason: format!(
                    "must exceed poll_timeout_seconds ({})",
                    self.transport.poll_timeout_seconds
                ),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("")
            .unwrap()
            .with_token(Some("123:abc".into()))
            .validated()
            .unwrap();
        assert_eq!(config.transport.kind, TransportKind::Telegram);
        assert_eq!(config.cache.capacity, 1024);
        assert_eq!(config.sessions.max_sessions, 10_000);
        assert_eq!(config.bot_token.as_deref(), Some("123:abc"));
    }

    #[test]
    fn file_overrides_selected_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[transport]
kind = "console"
console_user_id = 42

[cache]
capacity = 8
ttl_seconds = 0

[logging]
level = "debug"
stdout = false
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap().validated().unwrap();
        assert_eq!(config.transport.kind, TransportKind::Console);
        assert_eq!(config.transport.console_user_id, 42);
        assert_eq!(config.transport.poll_timeout_seconds, 30);
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.cache.ttl_seconds, 0);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.stdout);
        assert_eq!(config.logging.file, Some(PathBuf::from("bot.log")));
    }

    #[test]
    fn telegram_requires_token() {
        let err = Config::default().with_token(None).validated().unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken(TOKEN_ENV)));

        let err = Config::default()
            .with_token(Some("   ".into()))
            .validated()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(DEFAULT_CONFIG_PATH);
        let config = Config::load(&missing).unwrap();
        assert_eq!(config.cache.capacity, 1024);
        assert_eq!(config.transport.kind, TransportKind::Telegram);
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = Config::from_toml_str("[transport]\nkind = \"console\"\n[cache]\ncapacity = 0\n").unwrap();
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Invalid { field: "cache.capacity", .. })
        ));
    }

    #[test]
    fn poll_timeout_must_fit_in_request_timeout() {
        let config = Config::from_toml_str(
            "[transport]\npoll_timeout_seconds = 50\nrequest_timeout_seconds = 40\n",
        )
        .unwrap()
        .with_token(Some("t".into()));
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Invalid { field: "transport.request_timeout_seconds", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml_str("[cache\ncapacity = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
