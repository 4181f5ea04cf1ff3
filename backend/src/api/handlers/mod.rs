//! # API Request Handlers
//!
//! Each resource has its own module. Every handler follows the same shape:
//!
//! 1. Extractors authenticate the caller and validate path, query and body
//! 2. `AppState::connect` opens this request's connection scope
//! 3. Queries run on the scope's client
//! 4. The result is wrapped in an envelope; the scope releases on return
//!
//! Any failure is returned as an [`ApiError`](super::error::ApiError) and
//! rendered as the error envelope.

pub mod auth;
pub mod clientes;
pub mod consumos;
pub mod health;
pub mod insumos;
pub mod mantenimientos;
pub mod maquinas;
pub mod proveedores;
pub mod reportes;
pub mod tecnicos;
pub mod users;

use actix_web::HttpResponse;
use serde_json::json;

/// Root endpoint.
///
/// ## Response
///
/// ```json
/// { "message": "Welcome to Marloy Café API!" }
/// ```
pub async fn api_info() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to Marloy Café API!",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
