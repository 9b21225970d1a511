//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for the accounts server, built on the
//! Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Status
//! - `GET /` - Greeting
//! - `GET /status` - Liveness check
//!
//! ## Authentication
//! - `POST /register` - Create an account and start a session
//! - `POST /login` - Start a session
//! - `POST /logout` - Clear the session cookie
//!
//! ## Account
//! - `GET /user` - Current account details
//! - `DELETE /user` - Delete the current account
//!
//! # Authentication
//!
//! Protected endpoints read the RS256 session token from the `jwt` cookie set
//! by `/register` and `/login`:
//! ```text
//! Cookie: jwt=<token>
//! ```
//! The `Authorization` header is not consulted.
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api-docs/openapi.json`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
