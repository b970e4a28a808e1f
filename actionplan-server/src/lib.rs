//! actionplan-server: read-only HTTP API over the Action Plan database
//!
//! Exposes subjects (`sujet`) and actions (`action`) with their aggregate
//! counts as JSON. Every route runs one named, parameterized statement
//! through a pooled Postgres connection.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{DatabaseConfig, ServerConfig, TlsPolicy};
pub use http::{AppState, ServerError};

use db::{close_pool, create_pool, spawn_liveness_check, PgGateway};

/// Start the HTTP server and manage the pool lifecycle.
///
/// The pool is created lazily and checked in the background, so the listener
/// comes up even when the database is unreachable. After an interrupt the
/// server drains in-flight requests and the pool is closed.
pub async fn serve(server: ServerConfig, database: DatabaseConfig) -> Result<(), ServerError> {
    database.validate()?;

    tracing::info!(
        user = %database.user,
        host = %database.host,
        database = %database.database,
        port = database.port,
        tls = database.tls.as_str(),
        max_connections = database.max_connections,
        "Database configuration"
    );
    if database.tls == TlsPolicy::AcceptInvalidCerts {
        tracing::warn!("TLS: server certificate will not be verified");
    }

    let pool = create_pool(&database);
    spawn_liveness_check(pool.clone());

    let state = AppState::new(PgGateway::new(pool.clone()));
    let result = http::run_server(state, &server).await;

    close_pool(&pool).await;
    result
}
