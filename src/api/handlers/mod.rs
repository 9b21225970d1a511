//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (register, login, logout).
pub mod auth;
/// Root and liveness handlers.
pub mod status;
/// Account retrieval and deletion for the signed-in user.
pub mod user;
