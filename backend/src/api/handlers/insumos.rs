//! Supply endpoints, `/v1/insumos`. Public; updates are partial.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, ApiResponsePaginated, InsumoCreate, InsumoUpdate, PaginationQuery};
use crate::AppState;

pub async fn list_insumos(
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_insumos(client).await?;
    let items = queries::list_insumos(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_insumo(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let insumo = queries::get_insumo(conn.client()?, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Insumo"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(insumo)))
}

/// Create a supply. `id_proveedor` must reference an existing supplier.
///
/// ## Request
///
/// ```json
/// {
///     "descripcion": "Café en grano 1kg",
///     "tipo": "Café",
///     "precio_unitario": 450.0,
///     "id_proveedor": 2
/// }
/// ```
pub async fn create_insumo(
    state: web::Data<Arc<AppState>>,
    body: ValidJson<InsumoCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let insumo = queries::insert_insumo(conn.client()?, &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(insumo)))
}

pub async fn update_insumo(
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    body: ValidJson<InsumoUpdate>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    let insumo = queries::update_insumo(conn.client()?, id, &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Insumo"))?;

    info!("Insumo {} updated", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(insumo)))
}

pub async fn delete_insumo(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    if !queries::delete_insumo(conn.client()?, id).await? {
        return Err(ApiError::not_found("Insumo"));
    }

    info!("Insumo {} deleted", id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Insumo deleted successfully")))
}
