use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::{
    dto::{
        CreateRiderRequest, RiderCreated, RiderList, RiderListQuery, RiderResponse, RiderSummary,
        UpdateRiderRequest,
    },
    repo_types::Rider,
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn rider_routes() -> Router<AppState> {
    Router::new()
        .route("/riders", post(create_rider).get(list_riders))
        .route(
            "/riders/:id",
            get(get_rider).put(update_rider).delete(deactivate_rider),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_rider(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRiderRequest>,
) -> Result<(StatusCode, Json<RiderCreated>), ApiError> {
    let new = payload.validate()?;

    if Rider::find_by_email(&state.db, &new.email).await?.is_some() {
        warn!(email = %new.email, "email already registered");
        return Err(ApiError::conflict("Email already registered"));
    }

    let rider = Rider::create(&state.db, &new).await?;
    info!(rider_id = rider.rider_id, email = %rider.email, "rider registered");
    Ok((
        StatusCode::CREATED,
        Json(RiderCreated {
            message: "Rider registered successfully",
            rider: RiderSummary::from(&rider),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_riders(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<RiderListQuery>,
) -> Result<Json<RiderList>, ApiError> {
    let riders = Rider::list(&state.db, q.email.as_deref(), q.status).await?;
    Ok(Json(RiderList { riders }))
}

#[instrument(skip(state, user))]
pub async fn get_rider(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
) -> Result<Json<RiderResponse>, ApiError> {
    user.ensure_rider(id)?;

    let rider = Rider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Rider not found"))?;
    if !rider.is_active() {
        return Err(ApiError::forbidden("Account is inactive"));
    }
    Ok(Json(RiderResponse {
        message: None,
        rider,
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn update_rider(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateRiderRequest>,
) -> Result<Json<RiderResponse>, ApiError> {
    user.ensure_rider(id)?;
    let patch = payload.validate()?;

    let mut rider = Rider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Rider not found"))?;
    if !rider.is_active() {
        return Err(ApiError::forbidden("Cannot update inactive account"));
    }

    if let Some(email) = patch.email.as_deref().filter(|e| *e != rider.email) {
        if let Some(other) = Rider::find_by_email(&state.db, email).await? {
            if other.rider_id != rider.rider_id {
                warn!(rider_id = id, email, "email already in use");
                return Err(ApiError::conflict("Email already in use"));
            }
        }
    }

    patch.apply(&mut rider);
    let rider = Rider::save(&state.db, &rider).await?;
    info!(rider_id = id, "rider updated");
    Ok(Json(RiderResponse {
        message: Some("Rider updated successfully"),
        rider,
    }))
}

#[instrument(skip(state, user))]
pub async fn deactivate_rider(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Value>, ApiError> {
    user.ensure_rider(id)?;

    if Rider::deactivate(&state.db, id).await?.is_none() {
        return match Rider::find_by_id(&state.db, id).await? {
            Some(_) => Err(ApiError::bad_request("Account is already inactive")),
            None => Err(ApiError::not_found("Rider not found")),
        };
    }
    info!(rider_id = id, "rider deactivated");
    Ok(Json(json!({ "message": "Account deactivated successfully" })))
}
