//! Consumption record endpoints, `/v1/registro_consumos`. Public; updates
//! are partial.

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{
    ApiResponse, ApiResponsePaginated, PaginationQuery, RegistroConsumoCreate, RegistroConsumoUpdate,
};
use crate::AppState;

pub async fn list_consumos(
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_consumos(client).await?;
    let items = queries::list_consumos(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_consumo(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let consumo = queries::get_consumo(conn.client()?, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Registro de consumo"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(consumo)))
}

/// Record supply usage by a machine.
///
/// ## Request
///
/// ```json
/// { "id_maquina": 1, "id_insumo": 3, "fecha": "2025-05-02T09:15:00", "cantidad_usada": 2.5 }
/// ```
pub async fn create_consumo(
    state: web::Data<Arc<AppState>>,
    body: ValidJson<RegistroConsumoCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let consumo = queries::insert_consumo(conn.client()?, &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(consumo)))
}

pub async fn update_consumo(
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    body: ValidJson<RegistroConsumoUpdate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let consumo = queries::update_consumo(conn.client()?, path.into_inner(), &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Registro de consumo"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(consumo)))
}

pub async fn delete_consumo(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    if !queries::delete_consumo(conn.client()?, path.into_inner()).await? {
        return Err(ApiError::not_found("Registro de consumo"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Registro de consumo deleted successfully")))
}
