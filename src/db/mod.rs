//! Credential store.
//!
//! User records live in a relational database accessed through libsql:
//! - **Memory**: ephemeral SQLite for development and tests
//! - **SQLite**: a local database file
//! - **Turso**: a remote libsql database (`turso` feature)
//!
//! Enable the remote backend via Cargo features:
//! ```toml
//! accounts-server = { version = "*", features = ["turso"] }
//! ```

// Relational database
pub mod traits;
pub mod turso;

// Re-exports
pub use traits::{DatabaseProvider, User, UserStore};
pub use turso::TursoClient;
