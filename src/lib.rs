pub mod app;
pub mod client;
pub mod config;
pub mod database;
mod error;
pub mod model;
pub mod schema;
pub mod web;

pub use app::{App, AppState};
pub use client::WaitlistClient;
pub use error::{Error, Result};
pub use web::serve;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Compact, timeless output for local development and tests.
/// Honors `RUST_LOG`, defaults to `debug`.
pub fn init_dbg_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(filter)
        .compact()
        .init();
}

pub fn init_production_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
