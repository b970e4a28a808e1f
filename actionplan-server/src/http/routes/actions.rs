//! Action endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{query, QueryName, Row};
use crate::http::error::{ApiError, ACTION_NOT_FOUND};
use crate::http::extractors::ValidId;
use crate::http::server::AppState;

/// GET /actions/{id} - a single action
async fn get_action(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Row>, ApiError> {
    let row = state
        .gateway
        .fetch_optional(query(QueryName::GetAction), &[id])
        .await
        .map_err(ApiError::database("fetching action"))?
        .ok_or(ApiError::NotFound {
            message: ACTION_NOT_FOUND,
        })?;

    Ok(Json(row))
}

/// GET /actions/{id}/sous-actions - direct sub-actions
async fn list_sous_actions(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state
        .gateway
        .execute(query(QueryName::ListSousActions), &[id])
        .await
        .map_err(ApiError::database("listing sub-actions"))?;

    Ok(Json(rows))
}

/// Action routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/actions/{id}", get(get_action))
        .route("/actions/{id}/sous-actions", get(list_sous_actions))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::db::QueryName;
    use crate::http::{build_router, AppState};
    use crate::models::RecordId;
    use crate::testing::{get_json, FakeGateway};

    #[tokio::test]
    async fn get_action_returns_row() {
        let gateway = FakeGateway::new().with_rows(
            QueryName::GetAction,
            &[3],
            vec![json!({"id": 3, "sujet_id": 1, "status": "overdue", "ordre": 0})],
        );
        let app = build_router(AppState::new(gateway));

        let (status, body) = get_json(app, "/api/actions/3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "overdue");
    }

    #[tokio::test]
    async fn missing_action_is_404() {
        let app = build_router(AppState::new(FakeGateway::new()));

        let (status, body) = get_json(app, "/api/actions/99999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Action non trouvée"}));
    }

    #[tokio::test]
    async fn sub_actions_bind_parent_id() {
        let gateway = FakeGateway::new().with_rows(
            QueryName::ListSousActions,
            &[3],
            vec![json!({"id": 8, "parent_action_id": 3})],
        );
        let app = build_router(AppState::new(gateway.clone()));

        let (status, body) = get_json(app, "/api/actions/3/sous-actions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": 8, "parent_action_id": 3}]));
        assert_eq!(
            gateway.calls(),
            vec![(QueryName::ListSousActions, vec![RecordId::new(3)])]
        );
    }

    #[tokio::test]
    async fn sub_actions_of_leaf_is_empty_array() {
        let app = build_router(AppState::new(FakeGateway::new()));

        let (status, body) = get_json(app, "/api/actions/3/sous-actions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn database_failure_is_generic_500() {
        let app = build_router(AppState::new(FakeGateway::failing()));

        let (status, body) = get_json(app.clone(), "/api/actions/1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Erreur serveur"}));

        let (status, _) = get_json(app, "/api/actions/1/sous-actions").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
