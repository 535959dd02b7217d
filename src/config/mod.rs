// src/config/mod.rs
// Client configuration: ~/.timesheet/config.toml, then env, then defaults

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::session::default_session_path;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://globalconnect.somee.com/api/";

/// Environment variable naming the API base URL
pub const API_URL_ENV: &str = "TIMESHEET_API_URL";

/// Environment variable naming the session file
pub const SESSION_FILE_ENV: &str = "TIMESHEET_SESSION_FILE";

/// Contents of ~/.timesheet/config.toml. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// REST API base URL
    pub api_url: Option<String>,

    /// Where the session token is kept
    pub session_file: Option<PathBuf>,

    /// Per-request timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load config from ~/.timesheet/config.toml
    pub fn load() -> Self {
        let path = config_path();

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Resolved settings handed to the client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: default_session_path(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Resolve values: explicit overrides > env vars > config file > defaults.
    ///
    /// Overrides usually come from CLI flags; clap already folds their env
    /// vars in, so env lookup here covers library callers.
    pub fn resolve(
        api_url: Option<String>,
        session_file: Option<PathBuf>,
        file: FileConfig,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_url: api_url
                .or_else(|| std::env::var(API_URL_ENV).ok())
                .or(file.api_url)
                .unwrap_or(defaults.api_url),
            session_file: session_file
                .or_else(|| std::env::var(SESSION_FILE_ENV).ok().map(PathBuf::from))
                .or(file.session_file)
                .unwrap_or(defaults.session_file),
            timeout: file.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".timesheet")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_config_path() {
        let path = config_path();
        assert!(path.to_string_lossy().contains(".timesheet"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_parse_file_config() {
        let file = FileConfig::parse(
            r#"
            api_url = "http://localhost:5000/api/"
            session_file = "/tmp/ts-session.json"
            timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(file.api_url.as_deref(), Some("http://localhost:5000/api/"));
        assert_eq!(file.timeout_secs, Some(30));
    }

    #[test]
    fn test_explicit_override_wins() {
        let file = FileConfig {
            api_url: Some("http://from-file/".into()),
            session_file: None,
            timeout_secs: Some(5),
        };
        let config = ClientConfig::resolve(
            Some("http://from-flag/".into()),
            Some(PathBuf::from("/tmp/s.json")),
            file,
        );
        assert_eq!(config.api_url, "http://from-flag/");
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
