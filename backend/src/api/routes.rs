//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::web;

use super::error::{json_error_handler, path_error_handler, query_error_handler};
use super::handlers::{
    api_info, auth, clientes, consumos, health, insumos, mantenimientos, maquinas, proveedores, reportes,
    tecnicos, users,
};

/// Configure all API routes.
///
/// This function is called from main.rs (and from the route tests) to set
/// up every endpoint.
///
/// ## Route Structure
///
/// ```text
/// /                                   GET - Welcome message
/// /v1
/// ├── /health                         GET
/// ├── /auth/login                     POST
/// ├── /auth/me                        GET          (token)
/// ├── /clientes[/{id}]                GET POST PUT DELETE
/// ├── /maquinas[/{id}]                GET POST PUT DELETE   (admin)
/// ├── /proveedores[/{id}]             GET POST PUT DELETE   (admin)
/// ├── /insumos[/{id}]                 GET POST PUT DELETE
/// ├── /tecnicos[/{ci}]                GET POST PUT DELETE   (admin)
/// ├── /mantenimientos[/{id}]          GET POST PUT DELETE
/// ├── /registro_consumos[/{id}]       GET POST PUT DELETE
/// ├── /users[/{correo}]               GET POST DELETE       (admin)
/// └── /reportes
///     ├── /facturacion_mensual/{cliente_id}
///     ├── /insumos_mas_consumidos     (admin)
///     ├── /tecnicos_mas_mantenimientos (admin)
///     └── /clientes_mas_maquinas      (admin)
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(api_info)).service(
        web::scope("/v1")
            // Extractor failures become 400 envelopes
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::current_user)),
            )
            .service(
                web::scope("/clientes")
                    .route("", web::get().to(clientes::list_clientes))
                    .route("", web::post().to(clientes::create_cliente))
                    .route("/{id}", web::get().to(clientes::get_cliente))
                    .route("/{id}", web::put().to(clientes::update_cliente))
                    .route("/{id}", web::delete().to(clientes::delete_cliente)),
            )
            .service(
                web::scope("/maquinas")
                    .route("", web::get().to(maquinas::list_maquinas))
                    .route("", web::post().to(maquinas::create_maquina))
                    .route("/{id}", web::get().to(maquinas::get_maquina))
                    .route("/{id}", web::put().to(maquinas::update_maquina))
                    .route("/{id}", web::delete().to(maquinas::delete_maquina)),
            )
            .service(
                web::scope("/proveedores")
                    .route("", web::get().to(proveedores::list_proveedores))
                    .route("", web::post().to(proveedores::create_proveedor))
                    .route("/{id}", web::get().to(proveedores::get_proveedor))
                    .route("/{id}", web::put().to(proveedores::update_proveedor))
                    .route("/{id}", web::delete().to(proveedores::delete_proveedor)),
            )
            .service(
                web::scope("/insumos")
                    .route("", web::get().to(insumos::list_insumos))
                    .route("", web::post().to(insumos::create_insumo))
                    .route("/{id}", web::get().to(insumos::get_insumo))
                    .route("/{id}", web::put().to(insumos::update_insumo))
                    .route("/{id}", web::delete().to(insumos::delete_insumo)),
            )
            .service(
                web::scope("/tecnicos")
                    .route("", web::get().to(tecnicos::list_tecnicos))
                    .route("", web::post().to(tecnicos::create_tecnico))
                    .route("/{ci}", web::get().to(tecnicos::get_tecnico))
                    .route("/{ci}", web::put().to(tecnicos::update_tecnico))
                    .route("/{ci}", web::delete().to(tecnicos::delete_tecnico)),
            )
            .service(
                web::scope("/mantenimientos")
                    .route("", web::get().to(mantenimientos::list_mantenimientos))
                    .route("", web::post().to(mantenimientos::create_mantenimiento))
                    .route("/{id}", web::get().to(mantenimientos::get_mantenimiento))
                    .route("/{id}", web::put().to(mantenimientos::update_mantenimiento))
                    .route("/{id}", web::delete().to(mantenimientos::delete_mantenimiento)),
            )
            .service(
                web::scope("/registro_consumos")
                    .route("", web::get().to(consumos::list_consumos))
                    .route("", web::post().to(consumos::create_consumo))
                    .route("/{id}", web::get().to(consumos::get_consumo))
                    .route("/{id}", web::put().to(consumos::update_consumo))
                    .route("/{id}", web::delete().to(consumos::delete_consumo)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("", web::post().to(users::create_user))
                    .route("/{correo}", web::get().to(users::get_user))
                    .route("/{correo}", web::delete().to(users::delete_user)),
            )
            .service(
                web::scope("/reportes")
                    .route(
                        "/facturacion_mensual/{cliente_id}",
                        web::get().to(reportes::facturacion_mensual),
                    )
                    .route(
                        "/insumos_mas_consumidos",
                        web::get().to(reportes::insumos_mas_consumidos),
                    )
                    .route(
                        "/tecnicos_mas_mantenimientos",
                        web::get().to(reportes::tecnicos_mas_mantenimientos),
                    )
                    .route(
                        "/clientes_mas_maquinas",
                        web::get().to(reportes::clientes_mas_maquinas),
                    ),
            ),
    );
}
