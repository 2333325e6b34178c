use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::ActorClaims;
use crate::config::ServerConfig;
use crate::shared::AppError;

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration_days: i64,
}

impl TokenConfig {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_secret(&config.jwt_secret, config.token_expiration_days)
    }

    pub fn with_secret(secret: &str, expiration_days: i64) -> Self {
        Self {
            secret: secret.to_string(),
            expiration_days,
        }
    }

    /// Creates a signed token for the given user.
    ///
    /// The server never issues tokens itself; this is for tests and tooling
    /// that mint tokens against the same secret.
    #[instrument(skip(self, user_id))]
    pub fn create_token(&self, user_id: &str, admin: bool) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::days(self.expiration_days)).timestamp() as usize;

        debug!(
            expiration_days = self.expiration_days,
            exp_timestamp = exp,
            admin,
            "Creating JWT token with expiration"
        );

        let claims = ActorClaims {
            sub: user_id.to_string(),
            admin,
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<ActorClaims, AppError> {
        decode::<ActorClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| {
            debug!(user_id = %data.claims.sub, exp = data.claims.exp, "JWT token decoded successfully");
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::JwtError(e.to_string())
        })
    }
}
