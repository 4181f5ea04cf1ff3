//! # Maintenance Endpoints
//!
//! `/v1/mantenimientos`, public. Records are replaced wholesale on update.
//!
//! Creating a record first checks that the machine and the technician
//! exist, so the caller gets a `404` naming the missing one instead of a
//! generic foreign-key conflict.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tokio_postgres::Client;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, ApiResponsePaginated, MantenimientoCreate, PaginationQuery};
use crate::AppState;

/// Newest visits first.
pub async fn list_mantenimientos(
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_mantenimientos(client).await?;
    let items = queries::list_mantenimientos(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_mantenimiento(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let mantenimiento = queries::get_mantenimiento(conn.client()?, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Mantenimiento"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(mantenimiento)))
}

async fn ensure_references(client: &Client, body: &MantenimientoCreate) -> ApiResult<()> {
    if !queries::maquina_exists(client, body.id_maquina).await? {
        return Err(ApiError::NotFound("Machine not found".to_string()));
    }
    if !queries::tecnico_exists(client, &body.ci_tecnico).await? {
        return Err(ApiError::NotFound("Technician not found".to_string()));
    }
    Ok(())
}

/// Log a maintenance visit.
///
/// ## Request
///
/// ```json
/// {
///     "id_maquina": 1,
///     "ci_tecnico": "1234567-8",
///     "tipo": "Preventivo",
///     "fecha": "2025-05-23T14:30:00",
///     "observaciones": "Se realizó limpieza y lubricación de componentes."
/// }
/// ```
///
/// ## Errors
///
/// - `404 Machine not found`
/// - `404 Technician not found`
pub async fn create_mantenimiento(
    state: web::Data<Arc<AppState>>,
    body: ValidJson<MantenimientoCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    ensure_references(client, &body).await?;
    let mantenimiento = queries::insert_mantenimiento(client, &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(mantenimiento)))
}

pub async fn update_mantenimiento(
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    body: ValidJson<MantenimientoCreate>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;
    let client = conn.client()?;

    ensure_references(client, &body).await?;
    let mantenimiento = queries::update_mantenimiento(client, id, &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Mantenimiento"))?;

    info!("Mantenimiento {} updated", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(mantenimiento)))
}

pub async fn delete_mantenimiento(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    if !queries::delete_mantenimiento(conn.client()?, id).await? {
        return Err(ApiError::not_found("Mantenimiento"));
    }

    info!("Mantenimiento {} deleted", id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Mantenimiento deleted successfully")))
}
