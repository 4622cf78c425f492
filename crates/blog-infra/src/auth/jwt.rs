//! HS256 access tokens.
//!
//! Tokens only identify the account. Staff rights are looked up on the
//! stored user for every management request, so demoting someone takes
//! effect without waiting for their token to expire.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "blog-server".to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!("JWT_SECRET is not set; tokens are signed with the default key");
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.expiration_hours),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Registered claims plus the username shown back to the client.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    iat: i64,
    exp: i64,
    iss: String,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?
            .claims;

        Ok(TokenClaims {
            user_id: claims.sub,
            username: claims.username,
            issued_at: claims.iat,
            exp: claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}
