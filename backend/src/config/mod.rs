//! # Configuration Module
//!
//! This module handles loading and validating configuration from
//! environment variables. All settings are centralized here and loaded
//! exactly once at startup; the resulting [`AppConfig`] is immutable and
//! handed by reference to the database connector and the token service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("Database host: {}", config.database_host);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_HOST` | PostgreSQL host | required |
//! | `DATABASE_PORT` | PostgreSQL port | `5432` |
//! | `DATABASE_USER` | PostgreSQL user | required |
//! | `DATABASE_PASSWORD` | PostgreSQL password | required |
//! | `DATABASE_NAME` | Database name | required |
//! | `JWT_SECRET_KEY` | HMAC secret for access tokens | required |
//! | `JWT_ALGORITHM` | `HS256`, `HS384` or `HS512` | `HS256` |
//! | `JWT_ACCESS_TOKEN_EXPIRE_MINUTES` | Token lifetime | `30` |
//! | `SERVER_HOST` | HTTP server host | `127.0.0.1` |
//! | `SERVER_PORT` | HTTP server port | `8000` |

use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// Failed to parse a value
    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

/// Application configuration loaded from environment variables.
///
/// ## Example
///
/// ```rust,ignore
/// let config = AppConfig::from_env()?;
/// println!("Listening on {}:{}", config.server_host, config.server_port);
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ==========================================
    // DATABASE SETTINGS
    // ==========================================

    /// Hostname or IP address of the PostgreSQL server.
    pub database_host: String,

    /// TCP port of the PostgreSQL server.
    pub database_port: u16,

    /// User used to authenticate against the database.
    pub database_user: String,

    /// Password for `database_user`.
    pub database_password: String,

    /// Name of the database holding the rental tables.
    pub database_name: String,

    // ==========================================
    // TOKEN SETTINGS
    // ==========================================

    /// Secret used to sign and verify access tokens.
    pub jwt_secret_key: String,

    /// HMAC algorithm used for access tokens.
    pub jwt_algorithm: Algorithm,

    /// Access token lifetime in minutes.
    pub jwt_access_token_expire_minutes: i64,

    // ==========================================
    // SERVER SETTINGS
    // ==========================================

    /// HTTP server host address.
    ///
    /// Use `127.0.0.1` for localhost only, `0.0.0.0` to accept
    /// connections from any interface.
    pub server_host: String,

    /// HTTP server port number.
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Use `dotenvy::dotenv()` before calling this to load from `.env` file.
    ///
    /// ## Returns
    ///
    /// - `Ok(AppConfig)` - Configuration loaded successfully
    /// - `Err(ConfigError)` - A required variable is missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_algorithm = parse_algorithm(&or_default("JWT_ALGORITHM", "HS256"))?;

        let jwt_access_token_expire_minutes: i64 =
            parse_value("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", &or_default("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", "30"))?;
        if jwt_access_token_expire_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "JWT_ACCESS_TOKEN_EXPIRE_MINUTES".to_string(),
                "must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            // Database
            database_host: required("DATABASE_HOST")?,
            database_port: parse_value("DATABASE_PORT", &or_default("DATABASE_PORT", "5432"))?,
            database_user: required("DATABASE_USER")?,
            database_password: required("DATABASE_PASSWORD")?,
            database_name: required("DATABASE_NAME")?,

            // Tokens
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            jwt_algorithm,
            jwt_access_token_expire_minutes,

            // Server
            server_host: or_default("SERVER_HOST", "127.0.0.1"),
            server_port: parse_value("SERVER_PORT", &or_default("SERVER_PORT", "8000"))?,
        })
    }
}

/// Parse a typed value, naming the variable in the error.
fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError(key.to_string(), e.to_string()))
}

/// Only the HMAC family works with a shared secret.
fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw.trim())
        .map_err(|e| ConfigError::ParseError("JWT_ALGORITHM".to_string(), e.to_string()))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(ConfigError::InvalidValue(
            "JWT_ALGORITHM".to_string(),
            format!("{:?} requires a key pair, only HS256/HS384/HS512 are supported", other),
        )),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_HOST", "localhost"),
            ("DATABASE_USER", "marloy"),
            ("DATABASE_PASSWORD", "secret"),
            ("DATABASE_NAME", "marloy_cafe"),
            ("JWT_SECRET_KEY", "test-signing-key"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    /// A configuration pointing at a port nothing listens on.
    pub(crate) fn test_config() -> AppConfig {
        let mut vars = base_vars();
        vars.insert("DATABASE_HOST", "127.0.0.1");
        vars.insert("DATABASE_PORT", "1");
        load(&vars).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.database_port, 5432);
        assert_eq!(config.jwt_algorithm, Algorithm::HS256);
        assert_eq!(config.jwt_access_token_expire_minutes, 30);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8000);
    }

    #[test]
    fn test_missing_required_variable() {
        let mut vars = base_vars();
        vars.remove("JWT_SECRET_KEY");

        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::MissingEnvVar("JWT_SECRET_KEY".to_string())
        );
    }

    #[test]
    fn test_invalid_port_is_a_parse_error() {
        let mut vars = base_vars();
        vars.insert("SERVER_PORT", "eighty");

        assert!(matches!(load(&vars), Err(ConfigError::ParseError(key, _)) if key == "SERVER_PORT"));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let mut vars = base_vars();
        vars.insert("JWT_ALGORITHM", "RS256");

        assert!(matches!(load(&vars), Err(ConfigError::InvalidValue(key, _)) if key == "JWT_ALGORITHM"));
    }

    #[test]
    fn test_non_positive_token_lifetime_rejected() {
        let mut vars = base_vars();
        vars.insert("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", "0");

        assert!(load(&vars).is_err());
    }
}
