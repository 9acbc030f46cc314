//! Error types for the auction service
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors raised by the cache layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key has expired or holds no value
    #[error("Key expired: {0}")]
    Expired(String),

    /// Key rejected by validation
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The cache file exists but does not hold a serialized table
    #[error("Cache file {} is corrupted: {source}", .path.display())]
    Corruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the cache file failed
    #[error("Cache file {} I/O error: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be converted to or from JSON
    #[error("Failed to serialize cache value for {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

// == Auction Error Enum ==
/// Errors raised while fetching and aggregating auctions.
#[derive(Error, Debug)]
pub enum AuctionError {
    /// The upstream API reported failure, was unreachable, or timed out
    #[error("Upstream API error on page {page}: {cause}")]
    Upstream { page: u32, cause: String },

    /// An auction's item payload could not be decoded
    #[error("Failed to decode item of auction {auction_id}: {reason}")]
    ItemDecode { auction_id: String, reason: String },

    /// The upstream API rejected a player or profile request
    #[error("Upstream API error on {resource}: {cause}")]
    Api { resource: &'static str, cause: String },

    /// No auction with the requested id in the current listing
    #[error("Auction not found: {0}")]
    AuctionNotFound(String),

    /// The upstream API answered but holds no such player or profile
    #[error("No {resource} found for {id}")]
    ResourceNotFound { resource: &'static str, id: String },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

// == IntoResponse Implementation ==
impl CacheError {
    fn status(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) | CacheError::Expired(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CacheError::Corruption { .. }
            | CacheError::Io { .. }
            | CacheError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuctionError::Upstream { .. } | AuctionError::Api { .. } => StatusCode::BAD_GATEWAY,
            AuctionError::ItemDecode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AuctionError::AuctionNotFound(_) | AuctionError::ResourceNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            AuctionError::Cache(err) => err.status(),
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Convenience Result type for auction operations.
pub type AuctionResult<T> = std::result::Result<T, AuctionError>;
