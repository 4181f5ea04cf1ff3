//! # API Errors
//!
//! Every failure a handler can return, mapped to a status code and the
//! error envelope:
//!
//! | Variant | Status | Code |
//! |---------|--------|------|
//! | `Validation` | 400 | `VALIDATION_ERROR` |
//! | `Unauthorized` | 401 | `UNAUTHORIZED` |
//! | `Forbidden` | 403 | `FORBIDDEN` |
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `Conflict` | 409 | `CONFLICT` |
//! | `Infrastructure` | 500 | `INTERNAL_ERROR` |
//! | `ServiceUnavailable` | 503 | `SERVICE_UNAVAILABLE` |
//!
//! Infrastructure detail is logged where the error is converted; clients
//! only ever see a generic message.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::{header, StatusCode};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;
use tokio_postgres::error::SqlState;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::db::DatabaseError;
use crate::models::{ErrorResponse, ValidationError};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The message is already safe to show.
    #[error("{0}")]
    Infrastructure(String),

    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// `"<Entity> not found"`
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("Invalid authentication credentials".to_string())
    }

    pub fn not_admin() -> Self {
        Self::Forbidden("You do not have permission to perform this action".to_string())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Infrastructure(_) => "INTERNAL_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, Self::Unauthorized(_)) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }

        builder.json(ErrorResponse::new(self.code(), self.to_string()))
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match &err {
            DatabaseError::QueryError(pg) => match pg.code() {
                Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                    warn!("Unique constraint violated: {}", err);
                    Self::Conflict("Resource already exists".to_string())
                }
                Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => {
                    warn!("Foreign key constraint violated: {}", err);
                    Self::Conflict("Referenced resource does not exist or is still in use".to_string())
                }
                _ => {
                    error!("Database query failed: {}", err);
                    Self::Infrastructure("Database query failed".to_string())
                }
            },
            DatabaseError::ConnectionError(_) | DatabaseError::HandleUnavailable(_) => {
                error!("Database connection error: {}", err);
                Self::Infrastructure("Database connection error".to_string())
            }
            DatabaseError::MigrationError(_) => {
                error!("{}", err);
                Self::Infrastructure("Database query failed".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(detail) => {
                error!("Token signing failed: {}", detail);
                Self::Infrastructure("Could not issue access token".to_string())
            }
            _ => Self::invalid_credentials(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

// ============================================
// EXTRACTOR ERROR HANDLERS
// ============================================

/// Malformed or mistyped JSON bodies become 400 envelopes.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid path parameter: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::Value;

    use super::*;
    use crate::db::ScopeState;

    async fn body_of(err: &ApiError) -> Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::invalid_credentials().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_admin().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("Cliente").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Infrastructure("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[actix_rt::test]
    async fn test_not_found_envelope() {
        let body = body_of(&ApiError::not_found("Cliente")).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Cliente not found");
        assert!(body["timestamp"].is_i64());
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = ApiError::invalid_credentials().error_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[actix_rt::test]
    async fn test_connection_detail_is_not_leaked() {
        let err: ApiError =
            DatabaseError::ConnectionError("password authentication failed for user marloy".into()).into();
        let body = body_of(&err).await;

        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "Database connection error");
    }

    #[test]
    fn test_released_handle_is_infrastructure() {
        let err: ApiError = DatabaseError::HandleUnavailable(ScopeState::Released).into();
        assert!(matches!(err, ApiError::Infrastructure(_)));
    }

    #[test]
    fn test_auth_errors_map_to_401() {
        let err: ApiError = AuthError::Expired.into();
        assert_eq!(err, ApiError::invalid_credentials());
    }
}
