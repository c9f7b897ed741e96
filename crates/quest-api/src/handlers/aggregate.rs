//! Gateway aggregation handler

use axum::extract::State;
use axum::Json;
use quest_core::AggregatedQuest;

use crate::error::ApiError;
use crate::state::GatewayState;

/// GET /quests-reviews - quests with their reviews attached
pub async fn list_quests_reviews(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<AggregatedQuest>>, ApiError> {
    let quests = state.aggregator.aggregate().await?;
    Ok(Json(quests))
}
