//! API error types with IntoResponse
//!
//! Errors are converted to `{ "error": ... }` JSON bodies. Database details
//! are logged, never returned.

use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// Body message for every 500
pub const SERVER_ERROR_MESSAGE: &str = "Erreur serveur";

/// 404 message for a missing subject
pub const SUJET_NOT_FOUND: &str = "Sujet non trouvé";

/// 404 message for a missing action
pub const ACTION_NOT_FOUND: &str = "Action non trouvée";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Primary-key lookup matched nothing (404)
    NotFound { message: &'static str },

    /// Query failed (500, logged with the handler's context)
    Database {
        context: &'static str,
        source: DbError,
    },

    /// Path id could not be bound as a key (500, logged)
    InvalidId(ValidationError),

    /// Path parameters could not be extracted at all (500, logged)
    Path(PathRejection),

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    /// Wrap a gateway error with what the handler was doing.
    ///
    /// ```ignore
    /// gateway.execute(q, &[]).await.map_err(ApiError::database("listing subjects"))?;
    /// ```
    pub fn database(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Self::Database { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database { .. }
            | Self::InvalidId(_)
            | Self::Path(_)
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::NotFound { message } => *message,
            Self::Database { context, source } => {
                tracing::error!(%context, error = %source, "Database error");
                SERVER_ERROR_MESSAGE
            }
            Self::InvalidId(e) => {
                tracing::error!(error = %e, "Invalid path id");
                SERVER_ERROR_MESSAGE
            }
            Self::Path(rejection) => {
                tracing::error!(error = %rejection.body_text(), "Path extraction failed");
                SERVER_ERROR_MESSAGE
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                SERVER_ERROR_MESSAGE
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Path(rejection)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidId(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::QueryName;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_is_404_with_message() {
        let response = ApiError::NotFound {
            message: SUJET_NOT_FOUND,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Sujet non trouvé" })
        );
    }

    #[tokio::test]
    async fn database_error_is_generic_500() {
        let err = ApiError::database("listing subjects")(DbError::Query {
            query: QueryName::ListSujets,
            source: sqlx::Error::PoolTimedOut,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Erreur serveur" }));
        assert!(!body.to_string().contains("list_sujets"));
    }

    #[tokio::test]
    async fn invalid_id_is_500() {
        let err: ApiError = ValidationError::InvalidFormat {
            field: "id",
            reason: "must be an integer",
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Erreur serveur" })
        );
    }
}
