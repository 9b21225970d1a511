//! Session cookie attributes.
//!
//! The token travels in an HTTP-only cookie named [`SESSION_COOKIE_NAME`]. Whether
//! it is `Secure` and which `SameSite` mode it uses is a [`CookiePolicy`] chosen in
//! configuration. The default is the cross-site policy (`Secure; SameSite=None`),
//! which is what deployed front-ends on another origin need today; it should move
//! to `Strict` once the front-end is served from the API's own site.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{AppError, Result};

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE_NAME: &str = "jwt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookiePolicy {
    #[serde(default = "default_secure")]
    pub secure: bool,

    #[serde(default = "default_same_site")]
    pub same_site: SameSitePolicy,
}

fn default_secure() -> bool {
    true
}

fn default_same_site() -> SameSitePolicy {
    SameSitePolicy::None
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::cross_site()
    }
}

impl CookiePolicy {
    /// Plain-HTTP local development: no `Secure`, `SameSite=Lax`.
    pub fn local_development() -> Self {
        Self {
            secure: false,
            same_site: SameSitePolicy::Lax,
        }
    }

    /// Front-end on a different site: `Secure; SameSite=None`.
    pub fn cross_site() -> Self {
        Self {
            secure: default_secure(),
            same_site: default_same_site(),
        }
    }

    /// Cookie carrying `token`. A persistent `Expires` is set only when
    /// `expires_at` is given; otherwise the browser drops it with the session.
    pub fn session_cookie(
        &self,
        token: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Cookie<'static>> {
        let mut cookie = self.base(token);

        if let Some(expires_at) = expires_at {
            let expires = OffsetDateTime::from_unix_timestamp(expires_at.timestamp())
                .map_err(|e| AppError::Internal(format!("invalid cookie expiry: {}", e)))?;
            cookie.set_expires(expires);
        }

        Ok(cookie)
    }

    /// Empty cookie that makes the browser discard the stored token.
    pub fn cleared_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.set_max_age(time::Duration::ZERO);
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        cookie
    }

    fn base(&self, value: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site.into())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cross_site_cookie_attributes() {
        let cookie = CookiePolicy::cross_site()
            .session_cookie("token".to_string(), None)
            .expect("should build cookie");

        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert!(cookie.expires().is_none(), "session cookie has no expiry");
    }

    #[test]
    fn test_local_development_cookie_attributes() {
        let cookie = CookiePolicy::local_development()
            .session_cookie("token".to_string(), None)
            .expect("should build cookie");

        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_persistent_cookie_carries_expiry() {
        let expires_at = Utc::now() + Duration::days(28);
        let cookie = CookiePolicy::default()
            .session_cookie("token".to_string(), Some(expires_at))
            .expect("should build cookie");

        let expires = cookie
            .expires_datetime()
            .expect("persistent cookie should have an expiry");
        assert_eq!(expires.unix_timestamp(), expires_at.timestamp());
    }

    #[test]
    fn test_cleared_cookie_is_empty_and_expired() {
        let cookie = CookiePolicy::default().cleared_cookie();

        assert_eq!(cookie.name(), "jwt");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        let expires = cookie.expires_datetime().expect("should have an expiry");
        assert!(expires < OffsetDateTime::now_utc());
    }

    #[test]
    fn test_policy_from_toml() {
        let policy: CookiePolicy = toml::from_str("secure = false\nsame_site = \"lax\"")
            .expect("should parse");
        assert_eq!(policy, CookiePolicy::local_development());

        let policy: CookiePolicy = toml::from_str("").expect("should parse");
        assert_eq!(policy, CookiePolicy::cross_site());
    }
}
