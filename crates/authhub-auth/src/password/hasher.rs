//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use authhub_core::config::auth::AuthConfig;
use authhub_core::error::AppError;

/// Handles password hashing and verification using Argon2id.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish()
    }
}

impl PasswordHasher {
    /// Creates a new password hasher from auth configuration.
    ///
    /// `hash_work_factor` is the memory cost exponent: 2^n KiB. Verification
    /// always honors the parameters embedded in the stored hash, so existing
    /// hashes stay verifiable after the factor changes.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let memory_kib = 1u32
            .checked_shl(config.hash_work_factor)
            .ok_or_else(|| AppError::configuration("hash_work_factor is out of range"))?;
        let params = Params::new(memory_kib, 3, 1, None)
            .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a plaintext password with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not;
    /// a mismatch is never an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(&AuthConfig::default()).unwrap()
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hasher = hasher();
        let hash = hasher.hash_password("GoodPass1!").unwrap();
        assert_ne!(hash, "GoodPass1!");
        assert!(hasher.verify_password("GoodPass1!", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let hasher = hasher();
        let hash = hasher.hash_password("GoodPass1!").unwrap();
        assert!(!hasher.verify_password("WrongPass1!", &hash).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = hasher();
        let a = hasher.hash_password("GoodPass1!").unwrap();
        let b = hasher.hash_password("GoodPass1!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let hasher = hasher();
        assert!(hasher.verify_password("whatever", "not-a-phc-string").is_err());
    }
}
