//! # Report Endpoints
//!
//! | Path | Auth | Result |
//! |------|------|--------|
//! | `/v1/reportes/facturacion_mensual/{cliente_id}?month=&year=` | public | one row, `404` if empty |
//! | `/v1/reportes/insumos_mas_consumidos?limit=` | admin | ranking |
//! | `/v1/reportes/tecnicos_mas_mantenimientos?limit=` | admin | ranking |
//! | `/v1/reportes/clientes_mas_maquinas?limit=` | admin | ranking |
//!
//! Rankings with no data return an empty list.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extractors::{AdminUser, ValidQuery};
use crate::db::queries;
use crate::models::{ApiResponse, BillingPeriodQuery, LimitQuery};
use crate::AppState;

/// Monthly invoice for one client.
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "cliente_id": 1,
///         "nombre_cliente": "Oficinas Centrales XYZ",
///         "total_alquiler": 3000.0,
///         "total_insumos": 1125.0,
///         "total_a_cobrar": 4125.0
///     },
///     "timestamp": 1716470400
/// }
/// ```
pub async fn facturacion_mensual(
    state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    period: ValidQuery<BillingPeriodQuery>,
) -> ApiResult<HttpResponse> {
    let cliente_id = path.into_inner();
    let conn = state.connect().await?;

    let report = queries::report_facturacion_mensual(conn.client()?, cliente_id, period.month, period.year)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No billing data found for the specified client and date.".to_string())
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

pub async fn insumos_mas_consumidos(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<LimitQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let rows = queries::report_insumos_mas_consumidos(conn.client()?, query.limit).await?;

    debug!("insumos_mas_consumidos returned {} rows", rows.len());
    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}

pub async fn tecnicos_mas_mantenimientos(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<LimitQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let rows = queries::report_tecnicos_mas_mantenimientos(conn.client()?, query.limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}

pub async fn clientes_mas_maquinas(
    _admin: AdminUser,
    state: web::Data<Arc<AppState>>,
    query: ValidQuery<LimitQuery>,
) -> ApiResult<HttpResponse> {
    let conn = state.connect().await?;
    let rows = queries::report_clientes_mas_maquinas(conn.client()?, query.limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}
