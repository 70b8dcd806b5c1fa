use axum::{extract::State, Extension, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{PurchaseEvent, TrainRequest, TrainResponse},
    routes::AppState,
    services::preference_store::RecordOutcome,
};

/// Handler for purchase event ingestion
pub async fn train(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<Value>,
) -> AppResult<Json<TrainResponse>> {
    // A body that is not an object carries no fields
    let request: TrainRequest = serde_json::from_value(body).unwrap_or_default();

    let event = PurchaseEvent::try_from(request).inspect_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Rejected purchase event");
    })?;

    let response = match state.store.record_event(&event) {
        RecordOutcome::Recorded(counts) => TrainResponse::ok(counts),
        RecordOutcome::Ignored => {
            tracing::info!(
                request_id = %request_id,
                category = %event.category,
                "Ignored event with unrecognized category"
            );
            TrainResponse::ignored()
        }
    };

    Ok(Json(response))
}
