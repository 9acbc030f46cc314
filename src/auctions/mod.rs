//! Auctions Module
//!
//! Item payload decoding, per-item price aggregation and the service that
//! ties the upstream listing to the cache.

pub mod item;
mod listing;
mod record;
mod service;
mod summary;


// Re-export public types
pub use item::DecodedItem;
pub use listing::{format_remaining, listing_rows, ItemListing, ListingRow};
pub use record::{AuctionRecord, DecodedListing};
pub use service::AuctionService;
pub use summary::{collate, summarize, summarize_at, ItemPriceSummary, CLOSING_SOON_WINDOW_MS};
