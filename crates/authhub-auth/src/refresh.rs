//! Opaque refresh token generation and at-rest digests.
//!
//! Refresh tokens are never structured or signed; their only security
//! property is unguessability, and they are validated purely by store
//! lookup. At rest only a SHA-256 digest is kept, so a leaked sessions
//! table yields nothing usable.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Entropy carried by each refresh token, in bytes.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generates a cryptographically random, URL-safe refresh token with
/// 256 bits of entropy.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Computes the hex-encoded SHA-256 digest of a refresh token for
/// storage and lookup.
pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_url_safe_and_long_enough() {
        let token = generate_refresh_token();
        // 32 bytes → 43 base64url characters without padding.
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_digest_is_stable_hex() {
        let digest = token_digest("fixed-token");
        assert_eq!(digest, token_digest("fixed-token"));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(digest, token_digest("other-token"));
    }
}
