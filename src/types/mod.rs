use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Field name -> list of messages, as rendered in the `errors` envelope member.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

// ============= API Request/Response Types =============

/// Uniform JSON envelope returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok(message)
        }
    }

    pub fn failure(message: impl Into<String>, errors: Option<FieldErrors>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }
}

// ============= Authentication Types =============

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    pub remember_me: bool,
}

/// The verified `{userId, username}` pair carried by a valid session token.
///
/// Only [`TokenService::verify`](crate::auth::jwt::TokenService::verify) produces
/// one; handlers read it through the [`AuthUser`](crate::auth::middleware::AuthUser)
/// extractor and never derive identity from anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

/// Outward view of an account. The password hash never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

impl From<&crate::db::User> for UserSummary {
    fn from(user: &crate::db::User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

impl From<&Identity> for UserSummary {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.user_id,
            username: identity.username.clone(),
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        errors: FieldErrors,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        errors: FieldErrors,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Key error: {0}")]
    Key(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure attributed to one or more request fields.
    pub fn validation(message: &str, fields: &[&str]) -> Self {
        AppError::Validation {
            message: message.to_string(),
            errors: field_errors(message, fields),
        }
    }

    pub fn conflict(message: &str, field: &str) -> Self {
        AppError::Conflict {
            message: message.to_string(),
            errors: field_errors(message, &[field]),
        }
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_)
            | AppError::Key(_)
            | AppError::Signing(_)
            | AppError::Hashing(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn field_errors(message: &str, fields: &[&str]) -> FieldErrors {
    fields
        .iter()
        .map(|field| (field.to_string(), vec![message.to_string()]))
        .collect()
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let body = match self {
            AppError::Validation { message, errors } | AppError::Conflict { message, errors } => {
                ApiResponse::failure(message, Some(errors))
            }
            AppError::Auth(message)
            | AppError::NotFound(message)
            | AppError::InvalidInput(message)
            | AppError::PayloadTooLarge(message) => ApiResponse::failure(message, None),
            internal => {
                tracing::error!(error = %internal, "request failed");
                ApiResponse::failure("Internal server error", None)
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
