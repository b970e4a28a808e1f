//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is built
//! lazily so the HTTP listener never waits on the database; connectivity is
//! reported by a one-off background liveness check.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::config::DatabaseConfig;

/// How long a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Create a PostgreSQL connection pool without connecting yet.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config);
/// spawn_liveness_check(pool.clone());
/// ```
pub fn create_pool(config: &DatabaseConfig) -> PgPool {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(config.connect_options())
}

/// Acquire one connection and hand it straight back.
pub async fn check_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    let conn = pool.acquire().await?;
    drop(conn);
    Ok(())
}

/// Run [`check_connection`] in the background and log the outcome.
///
/// A failure does not stop the server; requests fail individually until the
/// database becomes reachable.
pub fn spawn_liveness_check(pool: PgPool) -> JoinHandle<bool> {
    tokio::spawn(async move {
        match check_connection(&pool).await {
            Ok(()) => {
                tracing::info!("PostgreSQL connection established");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "PostgreSQL connection failed");
                false
            }
        }
    })
}

/// Close every pooled connection, waiting for checked-out ones to return.
pub async fn close_pool(pool: &PgPool) {
    pool.close().await;
    tracing::info!("database pool closed");
}
