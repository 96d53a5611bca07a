use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::{
    dto::{CreateDriverRequest, DriverList, DriverListQuery, DriverResponse, UpdateDriverRequest},
    repo_types::Driver,
};
use crate::{
    error::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

/// Both spellings are in use by clients.
pub fn driver_routes() -> Router<AppState> {
    let mut router = Router::new();
    for base in ["/drivers", "/driver"] {
        router = router
            .route(base, post(create_driver).get(list_drivers))
            .route(
                &format!("{base}/:id"),
                get(get_driver).put(update_driver).delete(deactivate_driver),
            );
    }
    router
}

#[instrument(skip(state, payload))]
pub async fn create_driver(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDriverRequest>,
) -> Result<(StatusCode, Json<DriverResponse>), ApiError> {
    let new = payload.validate()?;

    if Driver::find_by_email(&state.db, &new.email).await?.is_some() {
        warn!(email = %new.email, "email already registered");
        return Err(ApiError::conflict("Email already registered"));
    }

    let driver = Driver::create(&state.db, &new).await?;
    info!(driver_id = driver.driver_id, email = %driver.email, "driver registered");
    Ok((
        StatusCode::CREATED,
        Json(DriverResponse {
            message: Some("Driver registered successfully"),
            driver,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_drivers(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<DriverListQuery>,
) -> Result<Json<DriverList>, ApiError> {
    let drivers = Driver::list(&state.db, q.email.as_deref(), q.status).await?;
    Ok(Json(DriverList { drivers }))
}

#[instrument(skip(state))]
pub async fn get_driver(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<DriverResponse>, ApiError> {
    let driver = Driver::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Driver not found"))?;
    Ok(Json(DriverResponse {
        message: None,
        driver,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_driver(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateDriverRequest>,
) -> Result<Json<DriverResponse>, ApiError> {
    let patch = payload.validate()?;

    let mut driver = Driver::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Driver not found"))?;
    if !driver.is_active() {
        return Err(ApiError::forbidden("Cannot update inactive account"));
    }

    if let Some(email) = patch.email.as_deref().filter(|e| *e != driver.email) {
        if let Some(other) = Driver::find_by_email(&state.db, email).await? {
            if other.driver_id != driver.driver_id {
                warn!(driver_id = id, email, "email already in use");
                return Err(ApiError::conflict("Email already in use"));
            }
        }
    }

    patch.apply(&mut driver);
    let driver = Driver::save(&state.db, &driver).await?;
    info!(driver_id = id, "driver updated");
    Ok(Json(DriverResponse {
        message: Some("Driver updated successfully"),
        driver,
    }))
}

#[instrument(skip(state))]
pub async fn deactivate_driver(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Value>, ApiError> {
    if Driver::deactivate(&state.db, id).await?.is_none() {
        return match Driver::find_by_id(&state.db, id).await? {
            Some(_) => Err(ApiError::bad_request("Account is already inactive")),
            None => Err(ApiError::not_found("Driver not found")),
        };
    }
    info!(driver_id = id, "driver deactivated");
    Ok(Json(json!({ "message": "Driver deactivated successfully" })))
}
