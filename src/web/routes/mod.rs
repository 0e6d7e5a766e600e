//! Contains all the routes that this application can handle.

mod api;

// re-export errors
pub use api::waitlist::WaitlistError;

use crate::{
    schema::{API_WAITLIST_COUNT_PATH, API_WAITLIST_PATH},
    AppState,
};

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .merge(waitlist_routes(app_state))
        .route("/health-check", get(health_check))
}

/// WAITLIST - paths are shared with the client through `schema`
fn waitlist_routes(app_state: AppState) -> Router {
    Router::new()
        .route(API_WAITLIST_PATH, post(api::waitlist_create))
        .route(API_WAITLIST_COUNT_PATH, get(api::waitlist_count))
        .with_state(app_state)
}
