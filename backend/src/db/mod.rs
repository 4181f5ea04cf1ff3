//! # Database Module
//!
//! This module handles all database access for the Marloy backend.
//! PostgreSQL stores the rental business data:
//!
//! - Clients, machines and where each machine is installed
//! - Suppliers and the supplies they provide
//! - Technicians and the maintenance they perform
//! - Supply consumption per machine (the basis of monthly billing)
//! - API users (`login` table)
//!
//! ## Connection Lifecycle
//!
//! There is no pool. Every request opens one fresh connection through a
//! [`Connector`], owns it for the duration of the handler inside a
//! [`ResourceScope`], and the scope closes it on the way out, whatever the
//! outcome.
//!
//! ```text
//! ┌──────────────┐   acquire()   ┌───────────────┐   release (Drop)   ┌──────────┐
//! │  UNACQUIRED  │ ────────────> │   ACQUIRED    │ ─────────────────> │ RELEASED │
//! └──────────────┘               └───────────────┘                    └──────────┘
//!        │ connect failed               │ handler runs queries
//!        └─> infrastructure error       └─> Ok / NotFound / query error
//! ```

pub mod models;
pub mod queries;
pub mod scope;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};
use tracing::{debug, info, warn};

use crate::config::AppConfig;

pub use scope::{ResourceHandle, ResourceScope, ScopeState};

/// Schema applied at startup. Every statement is idempotent.
const INITIAL_SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");

/// Database-related errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open (or keep) a connection to the database
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryError(#[from] tokio_postgres::Error),

    /// Migration failed
    #[error("Migration failed: {0}")]
    MigrationError(String),

    /// The scope does not currently hold a live handle
    #[error("Connection handle unavailable: scope is {0:?}")]
    HandleUnavailable(ScopeState),
}

/// Something that can open a fresh backing-store connection.
///
/// Implemented by [`Database`] for PostgreSQL; tests provide a counting fake.
pub trait Connector {
    /// The connection type handed to request handlers.
    type Handle: ResourceHandle;

    /// Open a new connection. Never reuses an earlier one.
    fn connect(&self) -> impl Future<Output = Result<Self::Handle, DatabaseError>>;
}

/// PostgreSQL connector built from the process-wide configuration.
///
/// Cheap to clone: it only carries connection parameters, not connections.
///
/// ## Usage
///
/// ```rust,ignore
/// let db = Database::new(&config);
/// let scope = ResourceScope::acquire(&db).await?;
/// let rows = scope.client()?.query("SELECT 1", &[]).await?;
/// ```
#[derive(Clone)]
pub struct Database {
    /// Connection parameters
    config: Config,
}

impl Database {
    /// Build a connector from the application configuration.
    ///
    /// No connection is opened here.
    pub fn new(app: &AppConfig) -> Self {
        let mut config = Config::new();
        config
            .host(&app.database_host)
            .port(app.database_port)
            .user(&app.database_user)
            .password(&app.database_password)
            .dbname(&app.database_name)
            .application_name("marloy-api")
            .connect_timeout(Duration::from_secs(10));

        Self { config }
    }

    /// Apply `migrations/001_initial_schema.sql`.
    ///
    /// Uses its own scoped connection, released before returning.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        info!("Running database migrations...");

        let scope = ResourceScope::acquire(self).await?;
        scope
            .client()?
            .batch_execute(INITIAL_SCHEMA)
            .await
            .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

        info!("Migrations completed successfully");
        Ok(())
    }
}

impl Connector for Database {
    type Handle = PgHandle;

    fn connect(&self) -> impl Future<Output = Result<PgHandle, DatabaseError>> {
        async move {
            let (client, connection) = self
                .config
                .connect(NoTls)
                .await
                .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

            // The connection object performs the actual socket IO; it resolves
            // once the client is dropped and the session is terminated.
            let driver = tokio::spawn(async move {
                if let Err(e) = connection.await {
                    warn!("Database connection closed with error: {}", e);
                }
            });

            debug!("Opened database connection");
            Ok(PgHandle { client, driver })
        }
    }
}

/// One open PostgreSQL session.
pub struct PgHandle {
    client: Client,
    driver: JoinHandle<()>,
}

impl PgHandle {
    /// The client used to run statements.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl ResourceHandle for PgHandle {
    fn release(self) -> Result<(), DatabaseError> {
        // A finished driver means the server side went away before we did.
        let lost = self.driver.is_finished();
        drop(self.client);

        if lost {
            Err(DatabaseError::ConnectionError(
                "connection was already closed by the server".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl ResourceScope<PgHandle> {
    /// Shortcut to the client of the held PostgreSQL handle.
    pub fn client(&self) -> Result<&Client, DatabaseError> {
        self.handle().map(PgHandle::client)
    }
}

/// Per-request PostgreSQL scope, the type handlers receive.
pub type DbConn = ResourceScope<PgHandle>;
