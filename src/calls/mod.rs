use crate::state::AppState;
use axum::Router;

pub mod curated;
pub mod dto;
pub mod handlers;
pub mod repo;
pub mod scorer;

pub fn router() -> Router<AppState> {
    handlers::call_routes()
}
