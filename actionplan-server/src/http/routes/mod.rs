//! Route handlers organized by resource

use std::sync::Arc;

use axum::Router;

use crate::http::server::AppState;

pub mod health;
pub mod sujets;
pub mod actions;
pub mod statistiques;

/// Every route served under `/api`
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(sujets::router())
        .merge(actions::router())
        .merge(statistiques::router())
}
