//! # Authentication Module
//!
//! Issues and verifies the bearer tokens handed out by `POST /v1/auth/login`.
//!
//! ## Token Format
//!
//! HMAC-signed JWT (HS256 by default) carrying:
//!
//! | Claim | Meaning |
//! |-------|---------|
//! | `sub` | user email (`login.correo`) |
//! | `is_admin` | whether admin-only routes are allowed |
//! | `iat` | issued at, Unix seconds |
//! | `exp` | expiry, Unix seconds |
//!
//! ## Flow
//!
//! ```text
//! login(correo, contraseña) ──> TokenService::issue ──> access_token
//!
//! Authorization: Bearer <token> ──> TokenService::verify ──> Claims
//!                                        │
//!                                        └─> AuthError ──> 401
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header
    #[error("Missing bearer token")]
    MissingToken,

    /// Signature, algorithm or format is wrong
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    Expired,

    /// Signing failed while issuing a token
    #[error("Token could not be issued: {0}")]
    Signing(String),
}

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies access tokens with the configured secret.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(config: &AppConfig) -> Self {
        let secret = config.jwt_secret_key.as_bytes();

        Self {
            algorithm: config.jwt_algorithm,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime: Duration::minutes(config.jwt_access_token_expire_minutes),
        }
    }

    /// Create a signed token for `subject`.
    pub fn issue(&self, subject: &str, is_admin: bool) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check signature, algorithm and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(self.algorithm);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })
    }
}

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    fn service() -> TokenService {
        TokenService::new(&test_config())
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = service();
        let token = tokens.issue("admin@marloy.com", true).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, "admin@marloy.com");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let stale = tokens
            .sign(&Claims {
                sub: "usuario@empresa.com".to_string(),
                is_admin: false,
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert_eq!(tokens.verify(&stale), Err(AuthError::Expired));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let mut other = test_config();
        other.jwt_secret_key = "some-other-key".to_string();
        let token = TokenService::new(&other).issue("admin@marloy.com", true).unwrap();

        assert!(matches!(service().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(service().verify("not.a.jwt"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer   ")), Err(AuthError::MissingToken));
    }
}
