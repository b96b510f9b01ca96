//! Stock-out report kernel library.
//!
//! This library exposes the report engine, host store adapters and HTTP
//! routes. The main entry point for running the server is the `stockout`
//! binary.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod routes;
pub mod state;

pub use config::Config;
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::stock_out::router())
        .merge(routes::health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
