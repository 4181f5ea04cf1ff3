//! # Technician Endpoints
//!
//! `/v1/tecnicos`, admin only. Technicians are keyed by `ci` (national id),
//! so the path parameter is a string.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{AdminUser, ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, ApiResponsePaginated, PaginationQuery, TecnicoCreate, TecnicoUpdate};
use crate::AppState;

pub async fn list_tecnicos(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_tecnicos(client).await?;
    let items = queries::list_tecnicos(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_tecnico(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let ci = path.into_inner();
    let conn = state.connect().await?;

    let tecnico = queries::get_tecnico(conn.client()?, &ci)
        .await?
        .ok_or_else(|| ApiError::not_found("Tecnico"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tecnico)))
}

/// Register a technician. A duplicate `ci` is a `409`.
///
/// ## Request
///
/// ```json
/// { "ci": "1234567-8", "nombre": "Juan", "apellido": "Pérez", "telefono": "098765432" }
/// ```
pub async fn create_tecnico(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    body: ValidJson<TecnicoCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let tecnico = queries::insert_tecnico(conn.client()?, &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(tecnico)))
}

pub async fn update_tecnico(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    body: ValidJson<TecnicoUpdate>,
) -> ApiResult<HttpResponse> {
    let ci = path.into_inner();
    let conn = state.connect().await?;

    let tecnico = queries::update_tecnico(conn.client()?, &ci, &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Tecnico"))?;

    info!("Tecnico {} updated", ci);
    Ok(HttpResponse::Ok().json(ApiResponse::success(tecnico)))
}

pub async fn delete_tecnico(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let ci = path.into_inner();
    let conn = state.connect().await?;

    if !queries::delete_tecnico(conn.client()?, &ci).await? {
        return Err(ApiError::not_found("Tecnico"));
    }

    info!("Tecnico {} deleted", ci);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Tecnico deleted successfully")))
}
