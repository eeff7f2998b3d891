use axum::{middleware, Router};

use crate::{auth::extractors::require_auth, state::AppState};

pub mod dto;
mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router(state: &AppState) -> Router<AppState> {
    let routes = handlers::catalog_routes();
    if state.config.systems_require_auth {
        routes.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
    } else {
        routes
    }
}
