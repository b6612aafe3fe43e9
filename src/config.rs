//! Engine configuration — backend origin, defaults, and transport timeouts.
//!
//! Loaded from `~/.converse/config.toml` when present, otherwise defaults.
//! `CONVERSE_BACKEND_URL` overrides the backend origin either way.

use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const BACKEND_URL_ENV: &str = "CONVERSE_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Fixed origin all endpoints are resolved against.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Assistant context used when the caller names none.
    #[serde(default)]
    pub default_assistant: Option<String>,
    /// Model sent with turn exchanges when the caller names none.
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            backend_url: default_backend_url(),
            default_assistant: None,
            default_model: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist. The env override is applied last.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self {
                config_path: path,
                ..Self::default()
            }
        };
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.backend_url = url;
        }
        Ok(config)
    }

    /// Parse a specific config.toml. Missing keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    fn default_path() -> Result<PathBuf> {
        let dirs = UserDirs::new().context("cannot determine home directory")?;
        Ok(dirs.home_dir().join(".converse").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn full_config_parses() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend_url = "http://backend.internal:9090"
default_assistant = "Assistant 1"
default_model = "gpt-4"
request_timeout_secs = 30
connect_timeout_secs = 5
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.backend_url, "http://backend.internal:9090");
        assert_eq!(config.default_assistant.as_deref(), Some("Assistant 1"));
        assert_eq!(config.default_model.as_deref(), Some("gpt-4"));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.config_path, file.path());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_assistant = \"Helper\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.backend_url, "http://localhost:8080");
        assert_eq!(config.default_model, None);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "backend_url = [not toml").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
