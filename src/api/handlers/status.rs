use crate::types::ApiResponse;
use axum::Json;

/// Greeting at the API root
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = ApiResponse)),
    tag = "status"
)]
pub async fn root() -> Json<ApiResponse> {
    Json(ApiResponse::ok("Hello, World!"))
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/status",
    responses((status = 200, description = "Server is up", body = ApiResponse)),
    tag = "status"
)]
pub async fn status() -> Json<ApiResponse> {
    Json(ApiResponse::ok("OK"))
}
