//! # Marloy API
//!
//! This is the main entry point for the backend of Marloy Café, a business
//! that rents coffee machines to companies and bills them monthly for rent
//! plus the supplies their machines consume. It provides:
//!
//! - CRUD endpoints for clients, machines, suppliers, supplies,
//!   technicians, maintenance visits and consumption records
//! - Reports (monthly billing and rankings)
//! - Token-based login with an admin role
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        MARLOY API                             │
//! │                                                               │
//! │  ┌──────────────┐   ┌────────────────┐   ┌────────────────┐  │
//! │  │  Extractors  │──>│    Handlers    │──>│   Envelopes    │  │
//! │  │ auth, query, │   │ one per route  │   │ ApiResponse /  │  │
//! │  │ json checks  │   │                │   │ Paginated      │  │
//! │  └──────────────┘   └───────┬────────┘   └────────────────┘  │
//! │                             │ AppState::connect               │
//! │                     ┌───────┴────────┐                        │
//! │                     │ ResourceScope  │ one connection per     │
//! │                     │ (released on   │ request, never pooled  │
//! │                     │  every exit)   │                        │
//! │                     └───────┬────────┘                        │
//! │                             │                                 │
//! │                     ┌───────┴────────┐                        │
//! │                     │   PostgreSQL   │                        │
//! │                     └────────────────┘                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Set up PostgreSQL and create the database
//! 2. Put the variables listed in `config` into `.env`
//! 3. Start the server: `cargo run` (the schema is applied at startup)

use std::io;
use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod api;
mod auth;
mod config;
mod db;
mod models;
mod utils;

use auth::TokenService;
use config::AppConfig;
use db::{Database, DatabaseError, DbConn, ResourceScope};

/// Application state shared across all handlers.
///
/// Built once at startup and never mutated afterwards. It holds connection
/// parameters, not connections: each request opens its own.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// PostgreSQL connector
    pub db: Database,

    /// Access token issuer/verifier
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            db: Database::new(&config),
            tokens: TokenService::new(&config),
            config,
        }
    }

    /// Open this request's connection scope.
    ///
    /// The scope closes the connection when dropped.
    pub async fn connect(&self) -> Result<DbConn, DatabaseError> {
        ResourceScope::acquire(&self.db).await
    }
}

fn to_io_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

/// Main entry point for the backend service.
///
/// This function:
/// 1. Initializes logging
/// 2. Loads configuration from the environment
/// 3. Applies the database schema
/// 4. Launches the HTTP server
#[actix_web::main]
async fn main() -> io::Result<()> {
    // =========================================
    // STEP 1: Initialize Logging
    // =========================================
    // RUST_LOG overrides the default level
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| to_io_error("Failed to set tracing subscriber", e))?;

    info!("Starting Marloy API v{}", env!("CARGO_PKG_VERSION"));

    // =========================================
    // STEP 2: Load Configuration
    // =========================================
    // A missing .env file is fine; the variables may come from the environment
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| to_io_error("Failed to load configuration", e))?;

    info!("Configuration loaded");
    info!(
        "   Database: {}@{}:{}/{}",
        config.database_user, config.database_host, config.database_port, config.database_name
    );
    info!(
        "   Tokens: {:?}, {} minute lifetime",
        config.jwt_algorithm, config.jwt_access_token_expire_minutes
    );

    // =========================================
    // STEP 3: Apply Schema
    // =========================================
    let app_state = Arc::new(AppState::new(config));

    app_state
        .db
        .run_migrations()
        .await
        .map_err(|e| to_io_error("Failed to run migrations", e))?;

    // =========================================
    // STEP 4: Start HTTP Server
    // =========================================
    let server_host = app_state.config.server_host.clone();
    let server_port = app_state.config.server_port;

    info!("Starting HTTP server on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))
            // Add logging middleware
            .wrap(middleware::Logger::default())
            // Accept both `/v1/clientes` and `/v1/clientes/`
            .wrap(middleware::NormalizePath::trim())
            // Configure API routes
            .configure(api::configure_routes)
    })
    .bind((server_host.as_str(), server_port))?
    .run()
    .await
}
