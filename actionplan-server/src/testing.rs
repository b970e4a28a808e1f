//! In-memory gateway and request helpers for router tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use crate::db::gateway::check_arity;
use crate::db::{DbError, QueryDef, QueryGateway, QueryName, Row};
use crate::models::RecordId;

type Call = (QueryName, Vec<RecordId>);

// --- Manual Mock: QueryGateway ---
// canned rows keyed by query name and bound parameters; unknown keys return
// no rows, the way an empty table would
#[derive(Clone, Default)]
pub struct FakeGateway {
    rows: Arc<Mutex<HashMap<Call, Vec<Row>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    failing: Arc<AtomicBool>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query fails as if the database were unreachable.
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.failing.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn with_rows(self, name: QueryName, params: &[i64], rows: Vec<Value>) -> Self {
        let key = (name, params.iter().copied().map(RecordId::new).collect());
        let rows = rows.into_iter().map(row).collect();
        self.rows.lock().unwrap().insert(key, rows);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryGateway for FakeGateway {
    async fn execute(&self, query: &QueryDef, params: &[RecordId]) -> Result<Vec<Row>, DbError> {
        check_arity(query, params)?;

        let key = (query.name(), params.to_vec());
        self.calls.lock().unwrap().push(key.clone());

        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::Query {
                query: query.name(),
                source: sqlx::Error::PoolTimedOut,
            });
        }

        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }
}

/// Turn a JSON object literal into a row.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("rows must be JSON objects, got {other}"),
    }
}

/// Send a GET through the router and decode the JSON body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
