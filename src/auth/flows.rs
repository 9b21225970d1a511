//! User-facing account operations built from the store, the password hasher and
//! the token service. HTTP handlers are thin wrappers around [`AuthFlows`].

use crate::auth::jwt::{IssuedToken, TokenService};
use crate::auth::password::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::db::{User, UserStore};
use crate::types::{AppError, Identity, LoginRequest, RegisterRequest, Result};
use axum_extra::extract::cookie::Cookie;
use regex::Regex;
use std::sync::{Arc, LazyLock};

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MSG_CREDENTIALS_REQUIRED: &str = "Username and password are required";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const MSG_PASSWORD_TOO_LONG: &str = "Password must be at most 1024 bytes";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address";
pub const MSG_USERNAME_TAKEN: &str = "Username already exists";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("email pattern is a valid regex")
});

/// Format check only; says nothing about deliverability.
pub fn is_email_shaped(username: &str) -> bool {
    EMAIL_PATTERN.is_match(username)
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: IssuedToken,
}

pub struct AuthFlows {
    users: Arc<dyn UserStore>,
    passwords: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    // Verified against when the username is unknown so both login failures cost the same.
    timing_decoy: String,
}

impl AuthFlows {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Result<Self> {
        let timing_decoy = passwords.hash("timing-decoy-password")?;

        Ok(Self {
            users,
            passwords,
            tokens,
            timing_decoy,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Validates the request, stores the new account and signs a token for it.
    pub async fn register(&self, req: &RegisterRequest) -> Result<Session> {
        validate_registration(req)?;

        if self
            .users
            .get_user_by_username(&req.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(MSG_USERNAME_TAKEN, "username"));
        }

        let password_hash = self.hash_password(req.password.clone()).await?;
        let user_id = self
            .users
            .create_user(&req.username, &password_hash)
            .await?;

        tracing::info!(user_id, "registered new account");

        self.start_session(user_id, &req.username, req.remember_me)
    }

    /// Checks credentials. Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, req: &LoginRequest) -> Result<Session> {
        if req.username.is_empty() || req.password.is_empty() {
            return Err(AppError::validation(
                MSG_CREDENTIALS_REQUIRED,
                &["username", "password"],
            ));
        }

        let user = self.users.get_user_by_username(&req.username).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.timing_decoy.clone(),
        };
        let verified =
            self.verify_password(req.password.clone(), stored_hash).await? && user.is_some();

        match user {
            Some(user) if verified => {
                tracing::info!(user_id = user.id, "login succeeded");
                self.start_session(user.id, &user.username, req.remember_me)
            }
            _ => {
                tracing::debug!("login rejected");
                Err(AppError::Auth(MSG_INVALID_CREDENTIALS.to_string()))
            }
        }
    }

    /// Always succeeds. The client is told to drop its token; the token itself
    /// stays valid until it expires.
    pub fn logout(&self) -> Cookie<'static> {
        self.tokens.clear()
    }

    pub async fn get_account(&self, identity: &Identity) -> Result<User> {
        self.users
            .get_user_by_id(identity.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    /// Deletes the caller's account and returns the cookie that clears the session.
    pub async fn delete_account(&self, identity: &Identity) -> Result<Cookie<'static>> {
        self.users.delete_user(identity.user_id).await?;
        tracing::info!(user_id = identity.user_id, "deleted account");
        Ok(self.tokens.clear())
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool> {
        let passwords = self.passwords.clone();
        tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }

    fn start_session(&self, user_id: i64, username: &str, remember_me: bool) -> Result<Session> {
        let token = self.tokens.issue(user_id, username, remember_me)?;

        Ok(Session {
            identity: Identity {
                user_id,
                username: username.to_string(),
            },
            token,
        })
    }
}

fn validate_registration(req: &RegisterRequest) -> Result<()> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::validation(
            MSG_CREDENTIALS_REQUIRED,
            &["username", "password"],
        ));
    }

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(MSG_PASSWORD_TOO_SHORT, &["password"]));
    }

    if req.password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::validation(MSG_PASSWORD_TOO_LONG, &["password"]));
    }

    if req.password != req.password_confirm {
        return Err(AppError::validation(
            MSG_PASSWORD_MISMATCH,
            &["passwordConfirm"],
        ));
    }

    if !is_email_shaped(&req.username) {
        return Err(AppError::validation(MSG_INVALID_EMAIL, &["username"]));
    }

    Ok(())
}
