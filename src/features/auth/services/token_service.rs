use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::users::models::User;

/// Issues and validates HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.jwt_leeway.as_secs();

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            token_ttl: chrono::Duration::seconds(config.token_ttl.as_secs() as i64),
        }
    }

    /// Issue an access token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))
    }

    /// Validate a bearer token and recover the authenticated identity
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        let id = data
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            name: data.claims.name,
            email: data.claims.email,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use std::time::Duration;

    fn test_service() -> TokenService {
        TokenService::new(&AuthConfig {
            jwt_secret: "a-test-secret-that-is-long-enough-1234".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        })
    }

    fn test_user() -> User {
        User {
            id: 42,
            name: "Budi".to_string(),
            email: "budi@campus.test".to_string(),
            password_hash: String::new(),
            role: UserRole::Technician,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let service = test_service();
        let token = service.issue_token(&test_user()).unwrap();

        let user = service.validate_token(&token).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, UserRole::Technician);
        assert_eq!(user.email, "budi@campus.test");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = test_service();
        let mut token = service.issue_token(&test_user()).unwrap();
        token.push('x');

        assert!(matches!(
            service.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let service = test_service();
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "another-secret-that-is-long-enough-5678".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        });

        let token = other.issue_token(&test_user()).unwrap();
        assert!(service.validate_token(&token).is_err());
    }
}
