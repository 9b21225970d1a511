use crate::auth::clock::{Clock, SystemClock};
use crate::auth::cookie::CookiePolicy;
use crate::auth::keys::KeyMaterial;
use crate::types::{AppError, Identity, Result};
use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifetime of a token issued without "remember me".
pub const SESSION_LIFETIME_HOURS: i64 = 24;
/// Lifetime of a token issued with "remember me".
pub const REMEMBER_ME_LIFETIME_DAYS: i64 = 28;

const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: String,
    pub exp: i64,
}

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token claims are invalid")]
    InvalidClaims,
    #[error("token is malformed")]
    Malformed,
}

impl From<VerificationError> for AppError {
    fn from(_: VerificationError) -> Self {
        AppError::Auth("Unauthorized".to_string())
    }
}

/// A freshly signed token and the policy it was issued under.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub remember_me: bool,
}

/// Issues and verifies RS256 session tokens.
///
/// Tokens are self-contained: nothing is stored server-side, so a token stays
/// valid until its `exp` even after the client logs out.
pub struct TokenService {
    keys: KeyMaterial,
    cookie_policy: CookiePolicy,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a TokenService using wall-clock time.
    ///
    /// Fails with [`AppError::Key`] when the private key cannot sign or the
    /// public key does not verify what it signs.
    pub fn new(keys: KeyMaterial, cookie_policy: CookiePolicy) -> Result<Self> {
        Self::with_clock(keys, cookie_policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        keys: KeyMaterial,
        cookie_policy: CookiePolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let service = Self {
            keys,
            cookie_policy,
            clock,
        };
        service.check_key_pair()?;
        Ok(service)
    }

    pub fn cookie_policy(&self) -> &CookiePolicy {
        &self.cookie_policy
    }

    /// Signs a token for the given identity.
    ///
    /// The token expires after 24 hours, or after 28 days when `remember_me` is set.
    pub fn issue(&self, user_id: i64, username: &str, remember_me: bool) -> Result<IssuedToken> {
        let lifetime = if remember_me {
            Duration::days(REMEMBER_ME_LIFETIME_DAYS)
        } else {
            Duration::hours(SESSION_LIFETIME_HOURS)
        };
        let expires_at = self.clock.now() + lifetime;

        let claims = Claims {
            user_id,
            username: username.to_string(),
            exp: expires_at.timestamp(),
        };
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at,
            remember_me,
        })
    }

    /// Verifies a token and returns the identity it was issued for.
    pub fn verify(&self, token: &str) -> std::result::Result<Identity, VerificationError> {
        // Header problems are structural; claim decode errors only surface later.
        let header = decode_header(token).map_err(|_| VerificationError::Malformed)?;
        if header.alg != SIGNING_ALGORITHM {
            return Err(VerificationError::InvalidSignature);
        }

        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation())
            .map_err(classify)?;
        let claims = data.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(VerificationError::Expired);
        }

        if claims.user_id == 0 {
            return Err(VerificationError::InvalidClaims);
        }

        Ok(Identity {
            user_id: claims.user_id,
            username: claims.username,
        })
    }

    /// Cookie carrying an issued token, persistent only for "remember me".
    pub fn session_cookie(&self, issued: &IssuedToken) -> Result<Cookie<'static>> {
        let expires_at = issued.remember_me.then_some(issued.expires_at);
        self.cookie_policy
            .session_cookie(issued.token.clone(), expires_at)
    }

    /// Cookie telling the client to drop its token. Tokens already issued stay valid.
    pub fn clear(&self) -> Cookie<'static> {
        self.cookie_policy.cleared_cookie()
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.keys.encoding)
            .map_err(|e| AppError::Signing(format!("error signing the token: {}", e)))
    }

    fn validation(&self) -> Validation {
        // Expiry is checked against `self.clock`, not the library's system time.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }

    fn check_key_pair(&self) -> Result<()> {
        let probe = Claims {
            user_id: 1,
            username: "key-check".to_string(),
            exp: (self.clock.now() + Duration::minutes(1)).timestamp(),
        };
        let token = self
            .sign(&probe)
            .map_err(|e| AppError::Key(format!("private key cannot sign: {}", e)))?;

        decode::<Claims>(&token, &self.keys.decoding, &self.validation()).map_err(|e| {
            AppError::Key(format!(
                "public key does not verify tokens signed by the private key: {}",
                e
            ))
        })?;

        Ok(())
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> VerificationError {
    match err.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => VerificationError::InvalidSignature,
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => VerificationError::InvalidClaims,
        _ => VerificationError::Malformed,
    }
}
