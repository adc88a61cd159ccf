//! AgRelay HTTP API server (Axum).
//!
//! REST endpoints for message optimization, statistics, and health/status
//! monitoring.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with default configuration.
pub fn app() -> Router {
    app_with_state(AppState::new())
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::optimize_routes())
        .merge(routes::stats_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests;
