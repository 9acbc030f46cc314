//! Response DTOs for the auction API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::auctions::{DecodedItem, ItemPriceSummary};
use crate::cache::CacheStats;
use crate::upstream::Auction;

/// Response body for the index endpoint (GET /)
///
/// `auctions` summarizes running auctions, `auctions_raw` the full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub auctions: Vec<ItemPriceSummary>,
    pub auctions_raw: Vec<ItemPriceSummary>,
    /// Number of running auctions, including ones whose item failed to decode
    pub auctions_count: usize,
    /// Number of auctions in the full listing, including undecodable ones
    pub auctions_raw_count: usize,
    /// Auctions left out because their item could not be decoded
    pub skipped_items: usize,
}

/// Response body for a single auction (GET /auction/:id)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionDetailResponse {
    #[serde(flatten)]
    pub auction: Auction,
    pub item_data: DecodedItem,
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Entries dropped because they expired
    pub expired_evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired_evictions: stats.expired_evictions,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
