use crate::error::AppError;
use crate::models::{User, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distinguishes short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    pub token_type: TokenType,
    /// Present on access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> UserId {
        UserId::from(self.sub)
    }
}

/// Issues and verifies HS256-signed access and refresh tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        // jsonwebtoken tolerates 60s past `exp` by default; tokens expire exactly at `exp`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Lifetime of an access token in seconds, reported to clients as `expires_in`.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Generates an access token carrying the user's id and username.
    pub fn issue_access_token(&self, user: &User) -> Result<String, AppError> {
        self.issue(
            user.id,
            TokenType::Access,
            Some(user.username.clone()),
            self.access_ttl,
        )
    }

    /// Generates a refresh token carrying only the user's id.
    pub fn issue_refresh_token(&self, user_id: UserId) -> Result<String, AppError> {
        self.issue(user_id, TokenType::Refresh, None, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: UserId,
        token_type: TokenType,
        username: Option<String>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_uuid(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            token_type,
            username,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry and checks the token is of the `expected` type.
    ///
    /// Returns `AppError::Unauthorized` if the token is malformed, its signature is invalid,
    /// it has expired, or it is of the wrong type.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        if claims.token_type != expected {
            return Err(AppError::Unauthorized("Invalid token: wrong token type".into()));
        }
        Ok(claims)
    }
}
