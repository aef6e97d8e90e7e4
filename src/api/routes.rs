//! Route table

use axum::Router;
use axum::routing::{get, post};

use crate::api::handlers;
use crate::server::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/token", post(handlers::login))
        .route("/predict", post(handlers::predict))
        .with_state(state)
}
