use crate::auth::{jwt::TokenService, middleware::session_middleware};
use crate::types::{ApiResponse, LoginRequest, RegisterRequest, UserSummary};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Largest request body accepted on any route.
const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::status::root,
        crate::api::handlers::status::status,
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::logout,
        crate::api::handlers::user::get_account,
        crate::api::handlers::user::delete_account,
    ),
    components(schemas(ApiResponse, LoginRequest, RegisterRequest, UserSummary)),
    tags(
        (name = "status", description = "Liveness endpoints"),
        (name = "auth", description = "Registration and session endpoints"),
        (name = "user", description = "Account endpoints for the signed-in user"),
    )
)]
pub struct ApiDoc;

pub fn create_router(tokens: Arc<TokenService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/", get(crate::api::handlers::status::root))
        .route("/status", get(crate::api::handlers::status::status))
        .route("/register", post(crate::api::handlers::auth::register))
        .route("/login", post(crate::api::handlers::auth::login))
        .route("/logout", post(crate::api::handlers::auth::logout));

    let protected_routes = Router::new()
        // Protected routes (session cookie required)
        .route(
            "/user",
            get(crate::api::handlers::user::get_account)
                .delete(crate::api::handlers::user::delete_account),
        )
        .layer(middleware::from_fn_with_state(tokens, session_middleware));

    public_routes.merge(protected_routes)
}

/// Full application: routes, OpenAPI document and tower layers, bound to `state`.
pub fn app(state: AppState) -> Router {
    let tokens = state.auth.tokens().clone();

    create_router(tokens)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
