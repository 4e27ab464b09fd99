//! API Routes
//!
//! - `/analyze/` - document upload and analysis
//! - `/health` - health check
//! - `/` - status page

pub mod analyze;
pub mod health;
pub mod ui;

use axum::Router;
use tower_http::trace::TraceLayer;
use crate::middleware::apply_cors;
use crate::models::AppState;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    // The analyze router scopes CORS to POST itself so its OPTIONS handler is reachable
    let static_routes = Router::new()
        .merge(ui::router())
        .merge(health::router());

    Router::new()
        .merge(apply_cors(static_routes))
        .merge(analyze::router(state))
        .layer(TraceLayer::new_for_http())
}
