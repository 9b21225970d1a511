use crate::{
    types::{ApiResponse, AppError, LoginRequest, RegisterRequest, Result, UserSummary},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

fn parse_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|e| {
        // Without Content-Length the body limit only trips while the body is buffered
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Request body too large".to_string())
        } else {
            AppError::InvalidInput(format!("Error parsing JSON: {}", e.body_text()))
        }
    })
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered, session cookie set", body = ApiResponse),
        (status = 400, description = "Malformed JSON", body = ApiResponse),
        (status = 409, description = "Username already exists", body = ApiResponse),
        (status = 413, description = "Request body too large", body = ApiResponse),
        (status = 422, description = "Field validation failed", body = ApiResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ApiResponse>)> {
    let payload = parse_body(payload)?;

    let session = state.auth.register(&payload).await?;
    let cookie = state.auth.tokens().session_cookie(&session.token)?;

    let body = ApiResponse::with_data("Success", json!(UserSummary::from(&session.identity)));

    Ok((jar.add(cookie), Json(body)))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = ApiResponse),
        (status = 401, description = "Invalid username or password", body = ApiResponse),
        (status = 422, description = "Username and password are required", body = ApiResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<ApiResponse>)> {
    let payload = parse_body(payload)?;

    let session = state.auth.login(&payload).await?;
    let cookie = state.auth.tokens().session_cookie(&session.token)?;

    let body = ApiResponse::with_data("Success", json!(UserSummary::from(&session.identity)));

    Ok((jar.add(cookie), Json(body)))
}

/// Clear the session cookie. Succeeds whether or not a session existed.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = ApiResponse)
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<ApiResponse>) {
    (
        jar.add(state.auth.logout()),
        Json(ApiResponse::ok("Logged out successfully")),
    )
}
