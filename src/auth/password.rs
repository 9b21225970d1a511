use crate::types::{AppError, Result};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};

/// Longest password accepted for hashing, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// One-way salted password hashing using Argon2id.
///
/// Hashes are PHC strings (`$argon2id$v=19$...`) that embed their own salt and
/// parameters, so [`verify`](Self::verify) needs nothing besides the stored value.
#[derive(Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a password with a freshly generated salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::Hashing(format!(
                "password exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Hashing(format!("Failed to hash password: {}", e)))
    }

    /// Checks a password against a stored hash in constant time.
    ///
    /// A malformed stored hash is a mismatch, not an error.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
