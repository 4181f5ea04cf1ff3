//! Supplier endpoints, `/v1/proveedores`. Admin only.

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{AdminUser, ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, ApiResponsePaginated, PaginationQuery, ProveedorCreate, ProveedorUpdate};
use crate::AppState;

pub async fn list_proveedores(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_proveedores(client).await?;
    let items = queries::list_proveedores(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_proveedor(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let proveedor = queries::get_proveedor(conn.client()?, path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Proveedor"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(proveedor)))
}

pub async fn create_proveedor(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    body: ValidJson<ProveedorCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let proveedor = queries::insert_proveedor(conn.client()?, &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(proveedor)))
}

pub async fn update_proveedor(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    body: ValidJson<ProveedorUpdate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    let proveedor = queries::update_proveedor(conn.client()?, path.into_inner(), &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Proveedor"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(proveedor)))
}

pub async fn delete_proveedor(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;

    if !queries::delete_proveedor(conn.client()?, path.into_inner()).await? {
        return Err(ApiError::not_found("Proveedor"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("Proveedor deleted successfully")))
}
