//! Route-level tests.
//!
//! The application is wired exactly as in `main`, but the database port
//! points at nothing, so any request that reaches a handler body fails to
//! connect. That makes it observable whether the database was touched.
//!
//! The tests at the end mount a list handler on a counting connector to
//! follow one connection from acquire to release through the HTTP layer.

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::Value;

use super::configure_routes;
use super::error::ApiResult;
use super::extractors::ValidQuery;
use crate::config::tests::test_config;
use crate::db::models::ClienteRecord;
use crate::db::scope::tests::CountingConnector;
use crate::db::{DatabaseError, ResourceScope};
use crate::models::{ApiResponsePaginated, PaginationQuery};
use crate::AppState;

fn state() -> Arc<AppState> {
    Arc::new(AppState::new(test_config()))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn bearer(state: &AppState, correo: &str, is_admin: bool) -> (header::HeaderName, String) {
    let token = state.tokens.issue(correo, is_admin).unwrap();
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_rt::test]
async fn test_root_welcome() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "Welcome to Marloy Café API!");
}

#[actix_rt::test]
async fn test_admin_route_without_token_is_401() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/maquinas").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Invalid authentication credentials");
}

#[actix_rt::test]
async fn test_admin_route_with_user_token_is_403() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/v1/reportes/clientes_mas_maquinas")
        .insert_header(bearer(&state, "usuario@empresa.com", false))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert_eq!(
        body["error"]["message"],
        "You do not have permission to perform this action"
    );
}

#[actix_rt::test]
async fn test_admin_token_passes_auth_then_hits_database() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/v1/maquinas")
        .insert_header(bearer(&state, "admin@marloy.com", true))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn test_tampered_token_is_401() {
    let state = state();
    let app = app!(state);

    let (name, value) = bearer(&state, "admin@marloy.com", true);
    let req = test::TestRequest::get()
        .uri("/v1/users")
        .insert_header((name, format!("{}x", value)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_page_zero_rejected_before_database() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/clientes?page=0").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_oversized_page_rejected() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/insumos?page_size=101").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_non_numeric_query_is_400() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/clientes?page=abc").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn test_non_numeric_path_is_400() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/clientes/abc").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_invalid_body_is_400() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/insumos")
        .set_json(serde_json::json!({
            "descripcion": "Leche en polvo",
            "precio_unitario": -1.0,
            "id_proveedor": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["message"], "precio_unitario: must be greater than 0");
}

#[actix_rt::test]
async fn test_malformed_json_is_400() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/v1/auth/login")
        .insert_header(header::ContentType::json())
        .set_payload("{\"correo\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_billing_month_out_of_range() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/v1/reportes/facturacion_mensual/1?month=13&year=2025")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_health_reports_503_when_database_is_down() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[actix_rt::test]
async fn test_unreachable_database_is_generic_500() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/clientes").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "Database connection error");
    assert!(body.get("data").is_none());
}

#[actix_rt::test]
async fn test_me_requires_token() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// A list handler backed by a counting connector, so acquire/release can be
// observed across a full request.
async fn list_with_lost_connection(
    connector: web::Data<CountingConnector>,
    query: ValidQuery<PaginationQuery>,
) -> ApiResult<actix_web::HttpResponse> {
    let conn = ResourceScope::acquire(connector.get_ref()).await?;
    conn.handle()?;

    let rows: Result<Vec<ClienteRecord>, DatabaseError> = Err(DatabaseError::ConnectionError(
        "server closed the connection unexpectedly".to_string(),
    ));
    let items = rows?;

    Ok(actix_web::HttpResponse::Ok().json(ApiResponsePaginated::wrap(
        true,
        items,
        0,
        query.page,
        query.page_size,
    )))
}

async fn list_after_early_release(connector: web::Data<CountingConnector>) -> ApiResult<actix_web::HttpResponse> {
    let mut conn = ResourceScope::acquire(connector.get_ref()).await?;
    conn.release();
    conn.handle()?;

    Ok(actix_web::HttpResponse::Ok().json(ApiResponsePaginated::<ClienteRecord>::wrap(true, Vec::new(), 0, 1, 10)))
}

#[actix_rt::test]
async fn test_failure_after_acquire_releases_and_returns_error_envelope() {
    let connector = CountingConnector::new();
    let tally = connector.tally.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(connector))
            .route("/v1/clientes", web::get().to(list_with_lost_connection)),
    )
    .await;

    let req = test::TestRequest::get().uri("/v1/clientes?page=2").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "Database connection error");
    assert!(body.get("data").is_none());
    assert!(body.get("total_items").is_none());

    assert_eq!(tally.acquired.get(), 1);
    assert_eq!(tally.released.get(), 1);
}

#[actix_rt::test]
async fn test_released_handle_is_an_internal_error() {
    let connector = CountingConnector::new();
    let tally = connector.tally.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(connector))
            .route("/v1/clientes", web::get().to(list_after_early_release)),
    )
    .await;

    let req = test::TestRequest::get().uri("/v1/clientes").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert!(body.get("data").is_none());
    assert_eq!(tally.acquired.get(), tally.released.get());
}

#[actix_rt::test]
async fn test_each_request_acquires_its_own_connection() {
    let connector = CountingConnector::new();
    let tally = connector.tally.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(connector))
            .route("/v1/clientes", web::get().to(list_with_lost_connection)),
    )
    .await;

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/v1/clientes").to_request();
        test::call_service(&app, req).await;
    }

    assert_eq!(tally.acquired.get(), 3);
    assert_eq!(tally.released.get(), 3);
}
