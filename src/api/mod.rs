//! API Module
//!
//! HTTP handlers and routing for the auction REST API.
//!
//! # Endpoints
//! - `GET /` - Price summaries per item
//! - `GET /api/all-auctions` - Merged raw listing
//! - `GET /auctions/:name` - Listing rows for one item
//! - `GET /auction/:id` - One auction with its decoded item
//! - `GET /player/:name` - Player record by name or uuid
//! - `GET /profile/:id` - SkyBlock profile
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
