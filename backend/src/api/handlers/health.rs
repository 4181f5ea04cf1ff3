//! `GET /v1/health`

use std::fmt::Display;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::models::ApiResponse;
use crate::AppState;

/// Health check: opens a connection and runs `SELECT 1`.
///
/// Unlike the other handlers, a database failure here is reported as
/// `503 Service Unavailable` instead of `500`.
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": { "message": "API is healthy!" },
///     "timestamp": 1716470400
/// }
/// ```
pub async fn health_check(state: web::Data<Arc<AppState>>) -> ApiResult<HttpResponse> {
    let conn = state.connect().await.map_err(unavailable)?;
    conn.client()
        .map_err(unavailable)?
        .query_one("SELECT 1", &[])
        .await
        .map_err(unavailable)?;

    info!(scope = %conn.id(), "Health check passed");
    Ok(HttpResponse::Ok().json(ApiResponse::message("API is healthy!")))
}

fn unavailable(err: impl Display) -> ApiError {
    error!("Health check failed: {}", err);
    ApiError::ServiceUnavailable("Database connection error".to_string())
}
