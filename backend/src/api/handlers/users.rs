//! API user management, `/v1/users`. Admin only.
//!
//! Users are keyed by email. Passwords are accepted on create and never
//! returned.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{AdminUser, ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, ApiResponsePaginated, PaginationQuery, UserCreate};
use crate::AppState;

pub async fn list_users(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_users(client).await?;
    let items = queries::list_users(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_user(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let correo = path.into_inner();
    let conn = state.connect().await?;

    let user = queries::get_user(conn.client()?, &correo)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

/// Create an API user.
///
/// ## Request
///
/// ```json
/// { "correo": "usuario@empresa.com", "contraseña": "password123", "es_administrador": false }
/// ```
pub async fn create_user(
    admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    body: ValidJson<UserCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let user = queries::insert_user(conn.client()?, &body).await?;

    info!("User {} created by {}", user.correo, admin.0.sub);
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn delete_user(
    admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let correo = path.into_inner();
    let conn = state.connect().await?;

    if !queries::delete_user(conn.client()?, &correo).await? {
        return Err(ApiError::not_found("User"));
    }

    info!("User {} deleted by {}", correo, admin.0.sub);
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
}
