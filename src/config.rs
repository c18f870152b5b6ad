//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::session::{ClientConfig, FileTokenStore, DEFAULT_BASE_URL, TOKEN_KEY};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_path")]
    pub token_path: String,

    #[serde(default)]
    pub clear_on_unauthorized: bool,
}

fn default_token_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("rimac-admin").join(TOKEN_KEY))
        .unwrap_or_else(|| PathBuf::from(".rimac-admin").join(TOKEN_KEY))
        .to_string_lossy()
        .to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
            clear_on_unauthorized: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, or from default locations
    ///
    /// An explicit path must load; default locations fall through on error.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("rimac-admin").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("RIMAC_ADMIN_API_URL") {
            self.api.url = url;
        }

        if let Ok(path) = std::env::var("RIMAC_ADMIN_TOKEN_PATH") {
            self.session.token_path = path;
        }

        if let Ok(level) = std::env::var("RIMAC_ADMIN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("RIMAC_ADMIN_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Session client settings derived from this config
    pub fn client_config(&self) -> ClientConfig {
        // Zero would time out every request
        let timeout_secs = match self.api.request_timeout_secs {
            0 => default_request_timeout(),
            secs => secs,
        };
        ClientConfig {
            base_url: self.api.url.clone(),
            request_timeout_ms: timeout_secs.saturating_mul(1000),
            clear_on_unauthorized: self.session.clear_on_unauthorized,
        }
    }

    /// File token store at the configured path
    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(&self.session.token_path)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# RIMAC Admin Configuration
#
# Environment variables override these settings:
# - RIMAC_ADMIN_API_URL
# - RIMAC_ADMIN_TOKEN_PATH
# - RIMAC_ADMIN_LOG_LEVEL
# - RIMAC_ADMIN_LOG_FORMAT

[api]
# Admin backend base URL
url = "{url}"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# File holding the session token
# token_path = "~/.local/share/rimac-admin/admin-token"

# Drop the stored session when the backend rejects the token (HTTP 401)
clear_on_unauthorized = false

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        url = DEFAULT_BASE_URL
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.url, DEFAULT_BASE_URL);
        assert_eq!(config.api.request_timeout_secs, 30);
        assert!(config.session.token_path.ends_with(TOKEN_KEY));
        assert!(!config.session.clear_on_unauthorized);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.url, DEFAULT_BASE_URL);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse(
            r#"
[api]
url = "http://localhost:3000"

[session]
token_path = "/tmp/token"
clear_on_unauthorized = true
"#,
        )
        .unwrap();

        assert_eq!(config.api.url, "http://localhost:3000");
        assert_eq!(config.api.request_timeout_secs, 30);

        let client = config.client_config();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.request_timeout_ms, 30_000);
        assert!(client.clear_on_unauthorized);
        assert_eq!(config.token_store().path(), Path::new("/tmp/token"));
    }

    #[test]
    fn test_request_timeout_bounds() {
        let mut config = Config::default();
        config.api.request_timeout_secs = u64::MAX;
        assert_eq!(config.client_config().request_timeout_ms, u64::MAX);

        let config = Config::parse("[api]\nrequest_timeout_secs = 0\n").unwrap();
        assert_eq!(config.client_config().request_timeout_ms, 30_000);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\nurl = ").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }
}
