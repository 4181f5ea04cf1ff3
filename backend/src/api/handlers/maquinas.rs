//! # Machine Endpoints
//!
//! `/v1/maquinas`, admin only. Updates are partial.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{AdminUser, ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, ApiResponsePaginated, MaquinaCreate, MaquinaUpdate, PaginationQuery};
use crate::AppState;

pub async fn list_maquinas(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_maquinas(client).await?;
    let items = queries::list_maquinas(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_maquina(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    let maquina = queries::get_maquina(conn.client()?, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Maquina"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(maquina)))
}

/// Install a machine at a client. The client must exist (`409` otherwise).
///
/// ## Request
///
/// ```json
/// {
///     "modelo": "Espresso Pro 3000",
///     "id_cliente": 1,
///     "ubicacion_cliente": "Recepción, planta baja",
///     "costo_alquiler_mensual": 1500.0
/// }
/// ```
pub async fn create_maquina(
    admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    body: ValidJson<MaquinaCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let maquina = queries::insert_maquina(conn.client()?, &body).await?;

    info!("Maquina {} created by {}", maquina.id, admin.0.sub);
    Ok(HttpResponse::Ok().json(ApiResponse::success(maquina)))
}

pub async fn update_maquina(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    body: ValidJson<MaquinaUpdate>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    let maquina = queries::update_maquina(conn.client()?, id, &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Maquina"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(maquina)))
}

pub async fn delete_maquina(
    admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    if !queries::delete_maquina(conn.client()?, id).await? {
        return Err(ApiError::not_found("Maquina"));
    }

    info!("Maquina {} deleted by {}", id, admin.0.sub);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Maquina deleted successfully")))
}
