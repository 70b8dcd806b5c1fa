use axum::{extract::State, Extension, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    middleware::RequestId, models::RecommendRequest, routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<Value>,
) -> Json<Vec<Option<String>>> {
    // A body that is not an object ranks an empty catalog
    let request: RecommendRequest = serde_json::from_value(body).unwrap_or_default();

    tracing::debug!(
        request_id = %request_id,
        catalog_size = request.catalog.len(),
        "Processing recommendation request"
    );

    Json(recommendations::get_recommendations(&state.store, request))
}
