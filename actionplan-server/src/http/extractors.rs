//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::RecordId;

/// Extract and validate a primary key from the `{id}` path segment
pub struct ValidId(pub RecordId);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state).await?;

        let id = RecordId::parse(&id)?;
        Ok(Self(id))
    }
}
