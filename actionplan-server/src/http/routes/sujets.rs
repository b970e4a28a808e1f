//! Subject endpoints
//!
//! Listings carry per-subject action counts; single lookups return the raw
//! `sujet` row.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{query, QueryName, Row};
use crate::http::error::{ApiError, SUJET_NOT_FOUND};
use crate::http::extractors::ValidId;
use crate::http::server::AppState;

/// GET /sujets - every subject with total, completed and overdue action counts
async fn list_sujets(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state
        .gateway
        .execute(query(QueryName::ListSujets), &[])
        .await
        .map_err(ApiError::database("listing subjects"))?;

    Ok(Json(rows))
}

/// GET /sujets/{id} - a single subject
async fn get_sujet(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Row>, ApiError> {
    let row = state
        .gateway
        .fetch_optional(query(QueryName::GetSujet), &[id])
        .await
        .map_err(ApiError::database("fetching subject"))?
        .ok_or(ApiError::NotFound {
            message: SUJET_NOT_FOUND,
        })?;

    Ok(Json(row))
}

/// GET /sujets/{id}/sous-sujets - direct children with action counts
async fn list_sous_sujets(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state
        .gateway
        .execute(query(QueryName::ListSousSujets), &[id])
        .await
        .map_err(ApiError::database("listing child subjects"))?;

    Ok(Json(rows))
}

/// GET /sujets-racines - subjects without a parent, with action and child counts
async fn list_sujets_racines(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state
        .gateway
        .execute(query(QueryName::ListSujetsRacines), &[])
        .await
        .map_err(ApiError::database("listing root subjects"))?;

    Ok(Json(rows))
}

/// GET /sujets/{id}/actions - top-level actions of a subject
async fn list_sujet_actions(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state
        .gateway
        .execute(query(QueryName::ListSujetActions), &[id])
        .await
        .map_err(ApiError::database("listing subject actions"))?;

    Ok(Json(rows))
}

/// Subject routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sujets", get(list_sujets))
        .route("/sujets/{id}", get(get_sujet))
        .route("/sujets/{id}/sous-sujets", get(list_sous_sujets))
        .route("/sujets/{id}/actions", get(list_sujet_actions))
        .route("/sujets-racines", get(list_sujets_racines))
}
