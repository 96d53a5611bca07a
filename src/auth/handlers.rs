use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Identity,
        dto::{AuthResponse, RefreshRequest, TokenExchangeRequest},
        extractors::AuthUser,
        services::JwtKeys,
    },
    drivers::repo_types::Driver,
    error::ApiError,
    extract::AppJson,
    riders::repo_types::Rider,
    state::AppState,
    validation::{is_valid_email, normalize_email},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(exchange))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Attaches the caller's active rider/driver records to an e-mail.
async fn resolve_identity(
    db: &PgPool,
    email: String,
    roles: Vec<String>,
) -> anyhow::Result<Identity> {
    let rider = Rider::find_by_email(db, &email).await?;
    let driver = Driver::find_by_email(db, &email).await?;
    Ok(Identity {
        rider_id: rider.filter(|r| r.is_active()).map(|r| r.rider_id),
        driver_id: driver.filter(|d| d.is_active()).map(|d| d.driver_id),
        email,
        roles,
    })
}

fn issue(keys: &JwtKeys, user: Identity) -> Result<Json<AuthResponse>, ApiError> {
    let access_token = keys.sign_access(&user)?;
    let refresh_token = keys.sign_refresh(&user)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn exchange(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TokenExchangeRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let verifier = state
        .id_tokens
        .clone()
        .ok_or_else(|| ApiError::Unavailable("Identity provider is not configured".into()))?;

    let claims = verifier.verify(&payload.id_token).map_err(|e| {
        warn!(error = %e, "id token rejected");
        ApiError::Unauthorized("Invalid identity token".into())
    })?;

    let email = normalize_email(claims.email());
    if !is_valid_email(&email) {
        warn!(sub = %claims.sub, "id token carries no usable email");
        return Err(ApiError::Unauthorized(
            "Identity token carries no email".into(),
        ));
    }

    let user = resolve_identity(&state.db, email, claims.roles()).await?;
    info!(email = %user.email, rider_id = ?user.rider_id, driver_id = ?user.driver_id, "session issued");
    issue(&JwtKeys::from_ref(&state), user)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| {
            warn!(error = %e, "refresh token rejected");
            ApiError::Unauthorized("Invalid or expired refresh token".into())
        })?;

    // Re-resolve so deactivated accounts drop out of the new pair.
    let user = resolve_identity(&state.db, claims.sub, claims.roles).await?;
    issue(&keys, user)
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<Identity> {
    Json(user)
}
