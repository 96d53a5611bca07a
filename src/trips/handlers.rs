use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AcceptTripRequest, CreateTripRequest, TripList, TripListQuery, TripResponse, UpdateTripRequest},
    repo_types::{Trip, TripFilter},
    status::{RideStatus, Transition},
};
use crate::{
    drivers::repo_types::Driver,
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    riders::repo_types::Rider,
    state::AppState,
    validation,
};

pub fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/trip", post(create_trip).get(list_trips))
        .route("/trip/status/:status", get(list_trips_by_status))
        .route("/trip/:id", get(get_trip).put(update_trip))
        .route("/trip/:id/accept", put(accept_trip))
        .route("/trip/:id/complete", put(complete_trip))
        .route("/trip/:id/cancel", put(cancel_trip))
}

#[instrument(skip(state, payload))]
pub async fn create_trip(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), ApiError> {
    let new = payload.validate()?;

    let rider = Rider::find_by_email(&state.db, &new.rider_id).await?;
    if !rider.is_some_and(|r| r.is_active()) {
        warn!(rider = %new.rider_id, "trip requested for unknown or inactive rider");
        return Err(ApiError::bad_request("Unknown or inactive rider"));
    }

    let trip = Trip::create(&state.db, &new).await?;
    info!(ride_id = trip.ride_id, rider = %trip.rider_id, "trip requested");
    Ok((
        StatusCode::CREATED,
        Json(TripResponse {
            message: Some("Trip requested successfully"),
            trip,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_trips(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<TripListQuery>,
) -> Result<Json<TripList>, ApiError> {
    let filter = TripFilter {
        status: None,
        rider: q.rider.as_deref(),
        driver: q.driver.as_deref(),
    };
    let trips = Trip::list(&state.db, filter).await?;
    Ok(Json(TripList { trips }))
}

#[instrument(skip(state))]
pub async fn list_trips_by_status(
    State(state): State<AppState>,
    AppPath(status): AppPath<String>,
    AppQuery(q): AppQuery<TripListQuery>,
) -> Result<Json<TripList>, ApiError> {
    let status: RideStatus = status.parse()?;
    let filter = TripFilter {
        status: Some(status),
        rider: q.rider.as_deref(),
        driver: q.driver.as_deref(),
    };
    let trips = Trip::list(&state.db, filter).await?;
    Ok(Json(TripList { trips }))
}

#[instrument(skip(state))]
pub async fn get_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = Trip::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Trip not found"))?;
    Ok(Json(TripResponse {
        message: None,
        trip,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateTripRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let patch = payload.validate()?;

    let mut trip = Trip::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Trip not found"))?;
    let expected = trip.ride_status;
    patch.apply(&mut trip)?;

    let trip = Trip::save(&state.db, &trip, expected)
        .await?
        .ok_or_else(|| ApiError::conflict("Trip status changed; retry the update"))?;
    info!(ride_id = id, "trip updated");
    Ok(Json(TripResponse {
        message: Some("Trip updated successfully"),
        trip,
    }))
}

/// Runs a status move and tells "missing" apart from "wrong state".
async fn run_transition(
    state: &AppState,
    id: i32,
    transition: Transition,
    driver: Option<&str>,
) -> Result<Trip, ApiError> {
    if let Some(trip) = Trip::transition(&state.db, id, transition, driver).await? {
        info!(ride_id = id, status = %trip.ride_status, driver = ?trip.driver_id, "trip status changed");
        return Ok(trip);
    }
    match Trip::find_by_id(&state.db, id).await? {
        Some(trip) => {
            warn!(ride_id = id, status = %trip.ride_status, ?transition, "transition rejected");
            Err(ApiError::bad_request(transition.rejection()))
        }
        None => Err(ApiError::not_found("Trip not found")),
    }
}

#[instrument(skip(state, payload))]
pub async fn accept_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<AcceptTripRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    validation::require(&[("DriverID", payload.driver_id.as_deref())])?;
    let email = validation::email(payload.driver_id.as_deref().unwrap_or_default())?;

    let driver = Driver::find_by_email(&state.db, &email).await?;
    if !driver.is_some_and(|d| d.is_active()) {
        return Err(ApiError::bad_request("Unknown or inactive driver"));
    }

    let trip = run_transition(&state, id, Transition::Accept, Some(email.as_str())).await?;
    Ok(Json(TripResponse {
        message: Some("Trip accepted"),
        trip,
    }))
}

#[instrument(skip(state))]
pub async fn complete_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = run_transition(&state, id, Transition::Complete, None).await?;
    Ok(Json(TripResponse {
        message: Some("Trip completed"),
        trip,
    }))
}

#[instrument(skip(state))]
pub async fn cancel_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = run_transition(&state, id, Transition::Cancel, None).await?;
    Ok(Json(TripResponse {
        message: Some("Trip cancelled"),
        trip,
    }))
}
