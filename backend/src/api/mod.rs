//! # REST API Module
//!
//! This module defines all HTTP endpoints of the Marloy API.
//!
//! ## Endpoint Overview
//!
//! | Resource | Path | Auth |
//! |----------|------|------|
//! | Health | `/v1/health` | - |
//! | Login | `/v1/auth/login` | - |
//! | Clients | `/v1/clientes` | - |
//! | Machines | `/v1/maquinas` | admin |
//! | Suppliers | `/v1/proveedores` | admin |
//! | Supplies | `/v1/insumos` | - |
//! | Technicians | `/v1/tecnicos` | admin |
//! | Maintenance | `/v1/mantenimientos` | - |
//! | Consumption | `/v1/registro_consumos` | - |
//! | Users | `/v1/users` | admin |
//! | Reports | `/v1/reportes/*` | admin, except billing |
//!
//! ## Request/Response Format
//!
//! All requests and responses use JSON:
//!
//! ```json
//! // Success response
//! {
//!     "success": true,
//!     "data": { ... },
//!     "timestamp": 1716470400
//! }
//!
//! // Error response
//! {
//!     "success": false,
//!     "error": {
//!         "code": "NOT_FOUND",
//!         "message": "Cliente not found"
//!     },
//!     "timestamp": 1716470400
//! }
//! ```

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use routes::configure_routes;

#[cfg(test)]
mod tests;
