//! Session Authentication
//!
//! This module provides the credential and session infrastructure for the
//! accounts API: password hashing, RS256 token signing and verification, the
//! session cookie, and the Axum middleware guarding protected routes.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2 password hashing
//! - [`auth::keys`](crate::auth::keys) - RSA key loading
//! - [`auth::jwt`](crate::auth::jwt) - Token issuance and verification
//! - [`auth::cookie`](crate::auth::cookie) - `jwt` cookie construction
//! - [`auth::middleware`](crate::auth::middleware) - Session middleware and extractor
//! - [`auth::flows`](crate::auth::flows) - Register, login, logout and account operations
//! - [`auth::clock`](crate::auth::clock) - Time source for token expiry
//!
//! # Tokens
//!
//! Tokens are RS256 JWTs carrying `userId`, `username` and `exp`. They live 24
//! hours, or 28 days when the user asked to be remembered, and cannot be revoked
//! before they expire.
//!
//! # Usage
//!
//! ```ignore
//! use accounts::auth::{jwt::TokenService, keys::KeyMaterial};
//!
//! let keys = KeyMaterial::from_sources("RSA_PRIVATE_KEY", Path::new("keys/public-key.pem"))?;
//! let tokens = TokenService::new(keys, config.auth.cookie.clone())?;
//! let issued = tokens.issue(user_id, "a@b.com", false)?;
//! let identity = tokens.verify(&issued.token)?;
//! ```
//!
//! ## Extracting the Identity in Handlers
//!
//! ```ignore
//! async fn protected_handler(AuthUser(identity): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", identity.username)
//! }
//! ```

/// Time source used for token expiry.
pub mod clock;
/// Session cookie construction.
pub mod cookie;
/// Registration, login, logout and account operations.
pub mod flows;
/// RS256 token issuance and verification.
pub mod jwt;
/// RSA key material loading.
pub mod keys;
/// Session middleware and extractors for protected routes.
pub mod middleware;
/// Argon2 password hashing.
pub mod password;
