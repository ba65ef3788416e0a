mod dto;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

/// User routes carry no token gate.
pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
