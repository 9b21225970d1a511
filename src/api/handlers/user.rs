use crate::{
    auth::middleware::AuthUser,
    types::{ApiResponse, Result, UserSummary},
    AppState,
};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

/// Get the signed-in user's account
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "Account details", body = ApiResponse),
        (status = 401, description = "Missing or invalid session cookie", body = ApiResponse),
        (status = 404, description = "Account no longer exists", body = ApiResponse)
    ),
    tag = "user"
)]
pub async fn get_account(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ApiResponse>> {
    let user = state.auth.get_account(&identity).await?;

    Ok(Json(ApiResponse::with_data(
        "Account Details Retrieved",
        json!({ "user": UserSummary::from(&user) }),
    )))
}

/// Delete the signed-in user's account and clear the session cookie
#[utoipa::path(
    delete,
    path = "/user",
    responses(
        (status = 200, description = "Account deleted", body = ApiResponse),
        (status = 401, description = "Missing or invalid session cookie", body = ApiResponse),
        (status = 404, description = "Account no longer exists", body = ApiResponse)
    ),
    tag = "user"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse>)> {
    let cleared = state.auth.delete_account(&identity).await?;

    Ok((jar.add(cleared), Json(ApiResponse::ok("Account Deleted"))))
}
