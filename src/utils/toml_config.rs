//! TOML-based configuration for the accounts server
//!
//! Infrastructure settings (listener, key sources, cookie policy, database) are
//! read from `accounts.toml`. Secrets never live in the file: it only names the
//! environment variables that hold them.

use crate::auth::cookie::CookiePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from accounts.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the RSA private key
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,

    /// Path of the PEM file holding the RSA public key
    #[serde(default = "default_public_key_path")]
    pub public_key_path: PathBuf,

    /// `Secure` / `SameSite` attributes of the session cookie
    #[serde(default)]
    pub cookie: CookiePolicy,
}

fn default_private_key_env() -> String {
    "RSA_PRIVATE_KEY".to_string()
}

fn default_public_key_path() -> PathBuf {
    PathBuf::from("keys/public-key.pem")
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            private_key_env: default_private_key_env(),
            public_key_path: default_public_key_path(),
            cookie: CookiePolicy::default(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database URL/path (`:memory:` for an ephemeral store)
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/accounts.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Loading & Validation =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(missing)) => {
                tracing::warn!(path = %missing.display(), "config file not found, using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.auth.private_key_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.private_key_env must name an environment variable".to_string(),
            ));
        }

        if self.auth.public_key_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.public_key_path must not be empty".to_string(),
            ));
        }

        if self.database.turso_url_env.is_some() != self.database.turso_token_env.is_some() {
            return Err(ConfigError::ValidationError(
                "database.turso_url_env and database.turso_token_env must be set together"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// `host:port` the server listens on
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookie::SameSitePolicy;

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"
log_format = "json"

[auth]
private_key_env = "TEST_RSA_PRIVATE_KEY"
public_key_path = "tests/fixtures/primary-public.pem"

[auth.cookie]
secure = false
same_site = "lax"

[database]
url = ":memory:"
"#
        .to_string()
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml_str(&create_test_config()).expect("should parse");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.auth.private_key_env, "TEST_RSA_PRIVATE_KEY");
        assert_eq!(config.auth.cookie, CookiePolicy::local_development());
        assert_eq!(config.database.url, ":memory:");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").expect("should parse");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.auth.private_key_env, "RSA_PRIVATE_KEY");
        assert_eq!(config.auth.cookie.same_site, SameSitePolicy::None);
        assert!(config.auth.cookie.secure);
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let result = AppConfig::from_toml_str("[server]\nport = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_same_site_is_rejected() {
        let result = AppConfig::from_toml_str("[auth.cookie]\nsame_site = \"sometimes\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_turso_envs_must_come_in_pairs() {
        let result = AppConfig::from_toml_str("[database]\nturso_url_env = \"TURSO_URL\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load("/definitely/not/here/accounts.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));

        let config = AppConfig::load_or_default("/definitely/not/here/accounts.toml")
            .expect("should fall back to defaults");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("accounts.toml");
        std::fs::write(&path, create_test_config()).expect("should write config");

        let config = AppConfig::load(&path).expect("should load");

        assert_eq!(config.server.log_level, "debug");
    }
}
