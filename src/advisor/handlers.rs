use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{TimeEstimateRequest, TimeEstimateResponse, TipEstimateRequest, TipEstimateResponse},
    services,
};
use crate::{error::ApiError, extract::AppJson, state::AppState};

pub fn estimate_routes() -> Router<AppState> {
    Router::new()
        .route("/trip/estimate/time", post(estimate_time))
        .route("/trip/estimate/tip", post(estimate_tip))
}

#[instrument(skip(state, payload))]
pub async fn estimate_time(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TimeEstimateRequest>,
) -> Result<Json<TimeEstimateResponse>, ApiError> {
    let (pickup, dropoff) = payload.validate()?;
    let est = services::estimate_minutes(state.advisor.as_deref(), &pickup, &dropoff).await;
    info!(minutes = est.value, source = ?est.source, "travel time estimated");
    Ok(Json(est.into()))
}

#[instrument(skip(state, payload))]
pub async fn estimate_tip(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TipEstimateRequest>,
) -> Result<Json<TipEstimateResponse>, ApiError> {
    let (fare, minutes) = payload.validate()?;
    let est = services::suggest_tip(state.advisor.as_deref(), fare, minutes).await;
    info!(tip = est.value, source = ?est.source, "tip suggested");
    Ok(Json(est.into()))
}
