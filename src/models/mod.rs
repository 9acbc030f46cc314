//! Response models for the auction API
//!
//! DTOs serialized into HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    AuctionDetailResponse, ErrorResponse, HealthResponse, IndexResponse, StatsResponse,
};
