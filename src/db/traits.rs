//! Database abstraction traits
//!
//! This module provides the `UserStore` trait that abstracts the credential store
//! over different database backends (in-memory SQLite, file-based SQLite, remote
//! Turso). Each entity gets its own repository trait; callers compose them.
//!
//! # Example
//!
//! ```rust,ignore
//! use accounts::db::DatabaseProvider;
//!
//! // Use in-memory database (default for development/testing)
//! let users = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let users = DatabaseProvider::SQLite { path: "data/accounts.db".into() }.create_client().await?;
//! ```

use crate::types::Result;
use crate::utils::toml_config::DatabaseConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl std::fmt::Debug for DatabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseProvider::Memory => f.write_str("Memory"),
            DatabaseProvider::SQLite { path } => f.debug_struct("SQLite").field("path", path).finish(),
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, .. } => f
                .debug_struct("Turso")
                .field("url", url)
                .field("auth_token", &"<redacted>")
                .finish(),
        }
    }
}

impl DatabaseProvider {
    /// Create a credential store from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<dyn UserStore>> {
        match self {
            DatabaseProvider::Memory => {
                let client = super::turso::TursoClient::new_memory().await?;
                Ok(Arc::new(client))
            }
            DatabaseProvider::SQLite { path } => {
                let client = super::turso::TursoClient::new_local(path).await?;
                Ok(Arc::new(client))
            }
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                let client =
                    super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await?;
                Ok(Arc::new(client))
            }
        }
    }

    /// Pick a provider from the `[database]` config section.
    ///
    /// Turso wins when both of its environment variables are set and non-empty.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        #[cfg(feature = "turso")]
        {
            let resolve = |name: &Option<String>| {
                name.as_deref()
                    .and_then(|n| std::env::var(n).ok())
                    .filter(|v| !v.is_empty())
            };
            if let (Some(url), Some(auth_token)) = (
                resolve(&config.turso_url_env),
                resolve(&config.turso_token_env),
            ) {
                return DatabaseProvider::Turso { url, auth_token };
            }
        }

        if !config.url.is_empty() && config.url != ":memory:" {
            return DatabaseProvider::SQLite {
                path: config.url.clone(),
            };
        }

        DatabaseProvider::Memory
    }
}

/// User record from the database
pub use super::turso::User;

/// Credential store: username + password hash records.
///
/// `create_user` must fail with [`AppError::Conflict`](crate::types::AppError::Conflict)
/// when the username is taken, as decided by the storage-level uniqueness
/// constraint rather than an earlier lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return the id the store assigned to it
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64>;

    /// Get a user by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Delete a user, failing with `NotFound` if no such user exists
    async fn delete_user(&self, id: i64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }

    #[test]
    fn test_memory_url_selects_memory() {
        assert_eq!(
            DatabaseProvider::from_config(&database_config(":memory:")),
            DatabaseProvider::Memory
        );
        assert_eq!(
            DatabaseProvider::from_config(&database_config("")),
            DatabaseProvider::Memory
        );
    }

    #[test]
    fn test_path_selects_sqlite() {
        assert_eq!(
            DatabaseProvider::from_config(&database_config("data/accounts.db")),
            DatabaseProvider::SQLite {
                path: "data/accounts.db".to_string()
            }
        );
    }

    #[test]
    fn test_debug_output_is_readable() {
        let provider = DatabaseProvider::SQLite {
            path: "data/accounts.db".to_string(),
        };
        assert_eq!(format!("{:?}", provider), "SQLite { path: \"data/accounts.db\" }");
    }

    #[tokio::test]
    async fn test_memory_provider_creates_store() {
        let store = DatabaseProvider::Memory
            .create_client()
            .await
            .expect("should create store");

        let user = store
            .get_user_by_username("nobody@example.com")
            .await
            .expect("query should succeed");
        assert!(user.is_none());
    }
}
