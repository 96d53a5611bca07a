mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod status;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::trip_routes()
}
