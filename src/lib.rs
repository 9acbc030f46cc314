//! SkyBlock Auctions - auction-house price aggregator
//!
//! Fetches the paged auction listing, decodes item payloads, computes per-item
//! price statistics and serves them over HTTP, backed by a TTL cache that is
//! snapshotted to disk.

pub mod api;
pub mod auctions;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use auctions::AuctionService;
pub use cache::SharedCache;
pub use config::Config;
pub use tasks::spawn_persist_task;
pub use upstream::{AuctionSource, HypixelClient};
