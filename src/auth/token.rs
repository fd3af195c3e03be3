use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,  // User ID
    pub iat: i64,  // Issued at
    pub exp: i64,  // Expiration time
}

/// Issues and verifies session tokens (HS256 JWTs).
///
/// The secret is fixed for the life of the service. Without one, tokens are
/// still issued but [`TokenService::verify`] rejects everything.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: Option<DecodingKey>,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: Option<&str>, ttl_hours: i64) -> Self {
        let secret = secret.filter(|s| !s.is_empty());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.unwrap_or_default().as_bytes()),
            decoding_key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
            validation,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if it were minted at `issued_at`.
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            id: user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let key = self.decoding_key.as_ref().ok_or(AuthError::InvalidToken)?;
        let data = decode::<Claims>(token, key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(Some(secret), DEFAULT_TOKEN_TTL_HOURS)
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let tokens = service("secret-a");
        let user = Uuid::new_v4();
        let claims = tokens.verify(&tokens.issue(user).unwrap()).unwrap();
        assert_eq!(claims.id, user);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn token_expires_after_one_day() {
        let tokens = service("secret-a");
        let user = Uuid::new_v4();

        let almost = tokens
            .issue_at(user, Utc::now() - Duration::hours(24) + Duration::minutes(1))
            .unwrap();
        assert!(tokens.verify(&almost).is_ok());

        let expired = tokens
            .issue_at(user, Utc::now() - Duration::hours(24) - Duration::seconds(1))
            .unwrap();
        assert!(matches!(tokens.verify(&expired), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let tokens = service("secret-a");
        let token = tokens.issue(Uuid::new_v4()).unwrap();

        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);

        assert!(matches!(tokens.verify(&tampered), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = service("secret-a").issue(Uuid::new_v4()).unwrap();
        assert!(matches!(service("secret-b").verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let tokens = service("secret-a");
        assert!(matches!(tokens.verify("garbage"), Err(AuthError::InvalidToken)));
        assert!(matches!(tokens.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn missing_secret_rejects_everything() {
        for secret in [None, Some("")] {
            let tokens = TokenService::new(secret, DEFAULT_TOKEN_TTL_HOURS);
            let token = tokens.issue(Uuid::new_v4()).unwrap();
            assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
        }
    }
}
