//! JWT access token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use authhub_core::config::auth::AuthConfig;
use authhub_core::error::{AppError, ErrorCode};

use super::claims::Claims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Expiry and malformed/forged tokens fail with distinct codes:
    /// clients rely on `TOKEN_EXPIRED` specifically to trigger an
    /// automatic refresh-and-retry.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::new(ErrorCode::TokenExpired, "Access token has expired")
                    }
                    _ => AppError::new(ErrorCode::InvalidToken, "Access token is invalid"),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use authhub_entity::role::Role;
    use authhub_entity::user::{User, UserWithRoles};
    use chrono::Utc;
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            ..AuthConfig::default()
        }
    }

    fn test_user() -> UserWithRoles {
        UserWithRoles {
            user: User {
                id: Uuid::new_v4(),
                email: "alice@example.com".into(),
                password_hash: "hash".into(),
                display_name: None,
                active: true,
                locked: false,
                failed_login_attempts: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            roles: vec![Role {
                id: 1,
                name: "client".into(),
                description: None,
            }],
        }
    }

    #[test]
    fn test_round_trip() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config);

        let user = test_user();
        let session_id = Uuid::new_v4();
        let (token, expires_at) = encoder.generate_access_token(&user, session_id).unwrap();

        let claims = decoder.decode_access_token(&token).unwrap();
        assert_eq!(claims.sub, user.user.id);
        assert_eq!(claims.sid, session_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.roles, vec!["client".to_string()]);
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_reports_token_expired() {
        let config = test_config();
        let decoder = JwtDecoder::new(&config);

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            sid: Uuid::new_v4(),
            email: "a@example.com".into(),
            roles: vec![],
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4(),
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = decoder.decode_access_token(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_garbage_token_reports_invalid_token() {
        let decoder = JwtDecoder::new(&test_config());
        let err = decoder.decode_access_token("not-a-jwt").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
    }

    #[test]
    fn test_wrong_secret_reports_invalid_token() {
        let encoder = JwtEncoder::new(&test_config()).unwrap();
        let (token, _) = encoder
            .generate_access_token(&test_user(), Uuid::new_v4())
            .unwrap();

        let other = AuthConfig {
            jwt_secret: "a-different-secret".into(),
            ..AuthConfig::default()
        };
        let decoder = JwtDecoder::new(&other);
        let err = decoder.decode_access_token(&token).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidToken);
    }
}
