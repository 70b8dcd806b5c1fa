use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::PreferencesResponse,
    routes::AppState,
    services::preference_store::PreferenceSource,
};

/// Handler returning the counters learned for one user
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<PreferencesResponse>> {
    let preferences = state
        .store
        .preferences(&user_id)
        .ok_or_else(|| AppError::NotFound(format!("No preferences recorded for user {user_id}")))?;

    Ok(Json(PreferencesResponse::new(user_id, preferences)))
}
