//! # Client Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/v1/clientes` | Paginated list |
//! | GET | `/v1/clientes/{id}` | One client |
//! | POST | `/v1/clientes` | Create |
//! | PUT | `/v1/clientes/{id}` | Replace all fields |
//! | DELETE | `/v1/clientes/{id}` | Delete |
//!
//! These routes are public.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{ValidJson, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, ApiResponsePaginated, ClienteCreate, PaginationQuery};
use crate::AppState;

/// List clients, one page at a time.
///
/// ## Query Parameters
///
/// - `page`: 1-based page number (default 1)
/// - `page_size`: items per page, 1 to 100 (default 10)
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": [ { "id": 1, "nombre": "Oficinas Centrales XYZ", ... } ],
///     "total_items": 25,
///     "page": 1,
///     "page_size": 10,
///     "total_pages": 3,
///     "timestamp": 1716470400
/// }
/// ```
///
/// A page past the end still succeeds, with `data: []`.
pub async fn list_clientes(
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let client = conn.client()?;

    let total_items = queries::count_clientes(client).await?;
    let items = queries::list_clientes(client, query.limit(), query.offset()).await?;

    Ok(HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        total_items,
        query.page,
        query.page_size,
    )))
}

pub async fn get_cliente(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    let cliente = queries::get_cliente(conn.client()?, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cliente"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(cliente)))
}

/// Create a client.
///
/// ## Request
///
/// ```json
/// {
///     "nombre": "Oficinas Centrales XYZ",
///     "direccion": "Av. Libertador 2000",
///     "telefono": "099123456",
///     "correo": "contacto@xyz.com"
/// }
/// ```
pub async fn create_cliente(
    state: web::Data<Arc<AppState>>,
    body: ValidJson<ClienteCreate>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let cliente = queries::insert_cliente(conn.client()?, &body).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(cliente)))
}

/// Replace every field of a client. Omitted optional fields become `null`.
pub async fn update_cliente(
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    body: ValidJson<ClienteCreate>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    let cliente = queries::update_cliente(conn.client()?, id, &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Cliente"))?;

    info!("Cliente {} updated", id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(cliente)))
}

/// Delete a client.
///
/// A client that still has machines cannot be deleted (`409`).
pub async fn delete_cliente(state: web::Data<Arc<AppState>>, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let conn = state.connect().await?;

    if !queries::delete_cliente(conn.client()?, id).await? {
        return Err(ApiError::not_found("Cliente"));
    }

    info!("Cliente {} deleted", id);
    Ok(HttpResponse::Ok().json(ApiResponse::message("Cliente deleted successfully")))
}
