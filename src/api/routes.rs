//! API Routes
//!
//! Configures the Axum router with all auction endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    all_auctions_handler, auction_handler, health_handler, index_handler, item_auctions_handler,
    player_handler, profile_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Price summaries per item
/// - `GET /api/all-auctions` - Merged raw listing
/// - `GET /auctions/:name` - Listing rows for one item
/// - `GET /auction/:id` - One auction with its decoded item
/// - `GET /player/:name` - Player record by name or uuid
/// - `GET /profile/:id` - SkyBlock profile
/// - `GET /cache/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/all-auctions", get(all_auctions_handler))
        .route("/auctions/:name", get(item_auctions_handler))
        .route("/auction/:id", get(auction_handler))
        .route("/player/:name", get(player_handler))
        .route("/profile/:id", get(profile_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
