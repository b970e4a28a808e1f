//! Query gateway - runs catalogue statements against the pool
//!
//! Handlers only see the [`QueryGateway`] trait, so tests can swap the
//! Postgres pool for an in-memory fake.

use async_trait::async_trait;
use sqlx::PgPool;

use super::queries::{QueryDef, QueryName};
use super::row::{self, Row};
use crate::models::RecordId;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("query {query} failed: {source}")]
    Query {
        query: QueryName,
        #[source]
        source: sqlx::Error,
    },

    #[error("query {query} expects {expected} parameter(s), got {actual}")]
    Arity {
        query: QueryName,
        expected: usize,
        actual: usize,
    },
}

/// Executes named, parameterized statements and returns rows as JSON objects.
#[async_trait]
pub trait QueryGateway: Send + Sync + 'static {
    /// Run `query` with positional `params`, returning every row in order.
    async fn execute(&self, query: &QueryDef, params: &[RecordId]) -> Result<Vec<Row>, DbError>;

    /// Run `query` and keep only its first row.
    async fn fetch_optional(
        &self,
        query: &QueryDef,
        params: &[RecordId],
    ) -> Result<Option<Row>, DbError> {
        Ok(self.execute(query, params).await?.into_iter().next())
    }
}

/// Check a call's parameter count against the query's declared arity.
pub fn check_arity(query: &QueryDef, params: &[RecordId]) -> Result<(), DbError> {
    if params.len() != query.arity() {
        return Err(DbError::Arity {
            query: query.name(),
            expected: query.arity(),
            actual: params.len(),
        });
    }
    Ok(())
}

/// Gateway backed by a sqlx Postgres pool.
///
/// The pool governs concurrent acquisition; the gateway is cheap to clone.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryGateway for PgGateway {
    async fn execute(&self, query: &QueryDef, params: &[RecordId]) -> Result<Vec<Row>, DbError> {
        check_arity(query, params)?;

        let mut statement = sqlx::query(query.shaped_sql());
        for param in params {
            statement = statement.bind(param.get());
        }

        let failed = |source: sqlx::Error| DbError::Query {
            query: query.name(),
            source,
        };

        let rows = statement.fetch_all(&self.pool).await.map_err(failed)?;

        tracing::debug!(query = %query.name(), rows = rows.len(), "query executed");
        rows.iter()
            .map(row::to_json)
            .collect::<Result<_, _>>()
            .map_err(failed)
    }
}
