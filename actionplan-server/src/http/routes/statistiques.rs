//! Global statistics endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{query, QueryName, Row};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /statistiques - subject and action totals plus one count per status
async fn statistiques(State(state): State<Arc<AppState>>) -> Result<Json<Row>, ApiError> {
    let row = state
        .gateway
        .fetch_optional(query(QueryName::Statistiques), &[])
        .await
        .map_err(ApiError::database("computing statistics"))?
        .ok_or_else(|| ApiError::Internal {
            message: "statistics query returned no row".into(),
        })?;

    Ok(Json(row))
}

/// Statistics routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/statistiques", get(statistiques))
}
