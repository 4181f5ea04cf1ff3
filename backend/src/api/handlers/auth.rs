//! Authentication endpoints.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{AuthenticatedUser, ValidJson};
use crate::db::queries;
use crate::models::{ApiResponse, LoginRequest, LoginResponseData};
use crate::AppState;

/// Exchange email and password for an access token.
///
/// ## Request
///
/// ```json
/// { "correo": "admin@marloy.com", "contraseña": "adminpass" }
/// ```
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": { "access_token": "eyJhbGciOi...", "is_admin": true },
///     "timestamp": 1716470400
/// }
/// ```
///
/// Wrong email and wrong password both give `401 Invalid credentials`.
pub async fn login(
    state: web::Data<Arc<AppState>>,
    body: ValidJson<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let user = queries::find_user_by_credentials(conn.client()?, &body.correo, &body.contrasena)
        .await?
        .ok_or_else(|| {
            warn!("Failed login for {}", body.correo);
            ApiError::Unauthorized("Invalid credentials".to_string())
        })?;

    let access_token = state.tokens.issue(&user.correo, user.es_administrador)?;
    info!("{} logged in (admin: {})", user.correo, user.es_administrador);

    Ok(HttpResponse::Ok().json(ApiResponse::success(LoginResponseData {
        access_token,
        is_admin: user.es_administrador,
    })))
}

/// The user the bearer token belongs to.
///
/// Answers `404` if the account was deleted after the token was issued.
pub async fn current_user(
    state: web::Data<Arc<AppState>>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let user = queries::get_user(conn.client()?, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}
