//! Backend collection handler

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::ResourceState;

/// GET {path} - every record the provider holds
pub async fn list_records<T>(
    State(state): State<ResourceState<T>>,
) -> Result<Json<Vec<T>>, ApiError>
where
    T: Serialize + Send + Sync + 'static,
{
    let records = state.provider.list().await?;
    tracing::debug!(count = records.len(), "Listing records");
    Ok(Json(records))
}
