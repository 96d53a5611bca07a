pub mod client;
mod dto;
pub mod handlers;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::estimate_routes()
}
