use crate::auth::cookie::SESSION_COOKIE_NAME;
use crate::auth::jwt::TokenService;
use crate::types::{AppError, Identity};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Rejects requests without a valid session cookie and stores the verified
/// [`Identity`] in the request extensions for the handler.
pub async fn session_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(req.headers());

    let token = jar
        .get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(unauthorized)?;

    let identity = tokens.verify(&token).map_err(|e| {
        tracing::debug!(reason = %e, "rejected session token");
        unauthorized()
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

fn unauthorized() -> AppError {
    AppError::Auth("Unauthorized".to_string())
}

/// Extractor for the identity verified by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookie::CookiePolicy;
    use crate::auth::keys::KeyMaterial;
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;

    const PRIVATE_PEM: &[u8] = include_bytes!("../../tests/fixtures/primary-private.pem");
    const PUBLIC_PEM: &[u8] = include_bytes!("../../tests/fixtures/primary-public.pem");

    async fn whoami(AuthUser(identity): AuthUser) -> String {
        format!("{}:{}", identity.user_id, identity.username)
    }

    fn create_test_server() -> (TestServer, Arc<TokenService>) {
        let keys = KeyMaterial::from_pem(PRIVATE_PEM, PUBLIC_PEM).expect("should parse keys");
        let tokens = Arc::new(
            TokenService::new(keys, CookiePolicy::local_development()).expect("should build"),
        );

        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(
                tokens.clone(),
                session_middleware,
            ));

        (TestServer::new(app).expect("should start"), tokens)
    }

    #[tokio::test]
    async fn test_valid_cookie_reaches_handler() {
        let (server, tokens) = create_test_server();
        let issued = tokens.issue(9, "a@b.com", false).expect("should issue");
        let cookie = tokens.session_cookie(&issued).expect("should build cookie");

        let response = server.get("/whoami").add_cookie(cookie).await;

        response.assert_status_ok();
        response.assert_text("9:a@b.com");
    }

    #[tokio::test]
    async fn test_missing_cookie_is_unauthorized() {
        let (server, _) = create_test_server();

        let response = server.get("/whoami").await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_cleared_cookie_is_unauthorized() {
        let (server, tokens) = create_test_server();

        let response = server.get("/whoami").add_cookie(tokens.clear()).await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_garbage_cookie_is_unauthorized() {
        let (server, _) = create_test_server();
        let cookie = axum_extra::extract::cookie::Cookie::new(SESSION_COOKIE_NAME, "garbage");

        let response = server.get("/whoami").add_cookie(cookie).await;

        response.assert_status_unauthorized();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_bearer_header_is_not_accepted() {
        let (server, tokens) = create_test_server();
        let issued = tokens.issue(9, "a@b.com", false).expect("should issue");

        let response = server
            .get("/whoami")
            .authorization_bearer(issued.token)
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_is_unauthorized() {
        let app = Router::new().route("/whoami", get(whoami));
        let server = TestServer::new(app).expect("should start");

        let response = server.get("/whoami").await;

        response.assert_status_unauthorized();
    }
}
