use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::claims::{Identity, TokenKind};
use super::services::JwtKeys;
use crate::error::ApiError;

/// Extracts and validates the bearer access token.
pub struct AuthUser(pub Identity);

impl AuthUser {
    /// Riders may only touch their own record.
    pub fn ensure_rider(&self, rider_id: i32) -> Result<(), ApiError> {
        if self.0.rider_id != Some(rider_id) {
            warn!(email = %self.0.email, rider_id, "rider ownership check failed");
            return Err(ApiError::forbidden("You can only access your own account"));
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let missing = || ApiError::Unauthorized("Access token required".into());
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(missing)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(missing)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            ApiError::forbidden("Invalid or expired token")
        })?;

        if claims.kind != TokenKind::Access {
            return Err(ApiError::forbidden("Invalid or expired token"));
        }

        Ok(AuthUser(claims.identity()))
    }
}
