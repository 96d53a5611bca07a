use serde::{Deserialize, Serialize};

use super::claims::Identity;

/// Request body for exchanging an identity-provider ID token.
#[derive(Debug, Deserialize)]
pub struct TokenExchangeRequest {
    pub id_token: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after exchange or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Identity,
}
