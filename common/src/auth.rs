// Authentication and JWT token handling

use crate::db::repositories::user::UserRepository;
use crate::errors::AuthError;
use crate::models::UserClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::{error, instrument};

/// Issued tokens live for one hour; expiry is their only destruction
/// mechanism (no server-side revocation).
pub const TOKEN_TTL_HOURS: i64 = 1;

/// JWT token service for encoding and decoding tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
}

impl JwtService {
    /// Create a new JWT service with the given signing secret
    #[instrument(skip(secret))]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    /// Encode a user's identity into a signed JWT token
    #[instrument(skip(self))]
    pub fn encode_token(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = UserClaims {
            id: user_id,
            email: email.to_string(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to encode JWT token");
            AuthError::AuthenticationFailed(format!("Failed to encode token: {}", e))
        })
    }

    /// Decode and validate a JWT token
    #[instrument(skip(self, token))]
    pub fn decode_token(&self, token: &str) -> Result<UserClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data =
            decode::<UserClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                error!(error = %e, "Failed to decode JWT token");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(format!("Token validation failed: {}", e)),
                }
            })?;

        Ok(token_data.claims)
    }
}

/// Credential verification and token issuance
#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    user_repository: Arc<UserRepository>,
}

impl AuthService {
    /// Create a new authentication service over the shared pool
    pub fn new(jwt_service: JwtService, user_repository: UserRepository) -> Self {
        Self {
            jwt_service,
            user_repository: Arc::new(user_repository),
        }
    }

    /// Authenticate a login attempt and issue a bearer token
    ///
    /// An unknown email and a wrong password both map to
    /// `InvalidCredentials`, so the outcome cannot be used to enumerate
    /// accounts.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        // Find user by email
        let user = self
            .user_repository
            .find_by_email(email)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error during login");
                AuthError::AuthenticationFailed(format!("Database error: {}", e))
            })?
            .ok_or_else(|| {
                tracing::warn!(email = %email, "Login attempt for unknown email");
                AuthError::InvalidCredentials
            })?;

        // Verify password against the stored salted hash
        let password_valid = bcrypt::verify(password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            AuthError::AuthenticationFailed(format!("Password verification failed: {}", e))
        })?;

        if !password_valid {
            tracing::warn!(email = %email, "Invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt_service.encode_token(user.id, &user.email)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_service_encode_decode() {
        let service = JwtService::new("test-secret");

        let token = service
            .encode_token(42, "a@x.com")
            .expect("Failed to encode token");

        let claims = service.decode_token(&token).expect("Failed to decode token");

        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn test_token_expiry_is_one_hour_after_issuance() {
        let service = JwtService::new("test-secret");

        let token = service
            .encode_token(7, "user@example.com")
            .expect("Failed to encode token");
        let claims = service.decode_token(&token).expect("Failed to decode token");

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_jwt_service_expired_token() {
        let service = JwtService::new("test-secret");

        // Craft a token that expired an hour ago
        let now = Utc::now();
        let claims = UserClaims {
            id: 1,
            email: "a@x.com".to_string(),
            exp: (now - Duration::hours(1)).timestamp(),
            iat: (now - Duration::hours(2)).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret("test-secret".as_bytes());
        let token =
            encode(&Header::default(), &claims, &encoding_key).expect("Failed to encode token");

        let result = service.decode_token(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_jwt_service_invalid_token() {
        let service = JwtService::new("test-secret");
        let result = service.decode_token("invalid.token.here");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_token_rejected_under_different_secret() {
        let issuer = JwtService::new("secret-one");
        let verifier = JwtService::new("secret-two");

        let token = issuer.encode_token(9, "b@x.com").expect("Failed to encode token");
        assert!(matches!(
            verifier.decode_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
