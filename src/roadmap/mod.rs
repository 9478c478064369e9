pub mod dto;
pub mod generator;
pub mod handlers;
pub mod model;
mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::roadmap_routes())
}
