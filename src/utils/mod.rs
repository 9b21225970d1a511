//! Configuration utilities.

/// TOML configuration (`accounts.toml`).
pub mod toml_config;
