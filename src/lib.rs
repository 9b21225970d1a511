//! # Accounts Server
//!
//! A minimal account API: users register with an email-shaped username and a
//! password, sign in to receive an RS256-signed session token in an HTTP-only
//! `jwt` cookie, and can read or delete their own account.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `accounts-server` binary
//! 2. **As a library** - Build the router into your own Axum application
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use accounts::{build_state, api::routes::app, AppConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load_or_default("accounts.toml")?;
//!     let state = build_state(config).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-db` | Local SQLite database (default) |
//! | `turso` | Remote Turso database |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, tokens, cookies and session middleware
//! - [`db`] - Credential store (SQLite, Turso)
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Session authentication and account flows.
pub mod auth;
/// Command-line interface of the server binary.
pub mod cli;
/// Credential store clients (SQLite, Turso).
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::flows::AuthFlows;
pub use auth::jwt::TokenService;
pub use db::{DatabaseProvider, TursoClient, UserStore};
pub use types::{AppError, Result};
pub use utils::toml_config::AppConfig;

use crate::auth::{keys::KeyMaterial, password::PasswordHasher};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Account flows (register, login, logout, get, delete)
    pub auth: Arc<AuthFlows>,
}

impl AppState {
    /// Assemble state from an opened credential store and a token service.
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Result<Self> {
        let auth = AuthFlows::new(users, Arc::new(PasswordHasher::new()), Arc::new(tokens))?;

        Ok(Self {
            auth: Arc::new(auth),
        })
    }
}

/// Load keys, open the credential store and wire up the account flows.
///
/// Fails if the key pair cannot be loaded or does not match, or if the
/// database cannot be opened.
pub async fn build_state(config: AppConfig) -> Result<AppState> {
    let keys = KeyMaterial::from_sources(
        &config.auth.private_key_env,
        &config.auth.public_key_path,
    )?;
    let tokens = TokenService::new(keys, config.auth.cookie.clone())?;

    let provider = DatabaseProvider::from_config(&config.database);
    tracing::info!(?provider, "opening credential store");
    let users = provider.create_client().await?;

    AppState::new(users, tokens)
}
