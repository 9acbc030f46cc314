//! API Handlers
//!
//! HTTP request handlers for each auction endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::auctions::{summarize_at, AuctionService, ItemListing};
use crate::cache::{current_timestamp_ms, keys, SharedCache};
use crate::error::AuctionResult;
use crate::models::{AuctionDetailResponse, HealthResponse, IndexResponse, StatsResponse};
use crate::upstream::Auction;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
    pub auctions: Arc<AuctionService>,
    /// Key sent to the upstream API
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(auctions: AuctionService, api_key: impl Into<Arc<str>>) -> Self {
        Self {
            cache: auctions.cache().clone(),
            auctions: Arc::new(auctions),
            api_key: api_key.into(),
        }
    }
}

/// Handler for GET /
///
/// Price summaries of running auctions and of the full listing, memoized for
/// an hour.
pub async fn index_handler(State(state): State<AppState>) -> AuctionResult<Json<IndexResponse>> {
    let index = state
        .cache
        .cached(keys::ROUTES_INDEX, keys::ROUTES_INDEX_TTL_MS, || build_index(&state))
        .await?;
    Ok(Json(index))
}

async fn build_index(state: &AppState) -> AuctionResult<IndexResponse> {
    let all = state.auctions.fetch_all_auctions(&state.api_key).await?;
    let listing = state.auctions.decode_records(&all).await;

    let now = current_timestamp_ms();
    let active = listing.active_at(now);
    Ok(IndexResponse {
        auctions: summarize_at(&active, now),
        auctions_raw: summarize_at(&listing.records, now),
        auctions_count: all.iter().filter(|auction| auction.end > now).count(),
        auctions_raw_count: all.len(),
        skipped_items: listing.failures.len(),
    })
}

/// Handler for GET /api/all-auctions
pub async fn all_auctions_handler(
    State(state): State<AppState>,
) -> AuctionResult<Json<Vec<Auction>>> {
    let auctions = state.auctions.fetch_all_auctions(&state.api_key).await?;
    Ok(Json(auctions))
}

/// Handler for GET /auctions/:name
///
/// Listing rows for one item, matched on its color-stripped display name.
pub async fn item_auctions_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AuctionResult<Json<ItemListing>> {
    let all = state.auctions.fetch_all_auctions(&state.api_key).await?;
    let listing = state.auctions.decode_records(&all).await;

    Ok(Json(ItemListing::build(
        &name,
        &listing.records,
        current_timestamp_ms(),
    )))
}

/// Handler for GET /auction/:id
pub async fn auction_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AuctionResult<Json<AuctionDetailResponse>> {
    let auction = state.auctions.find_auction(&state.api_key, &id).await?;
    let item_data = state.auctions.decode_item(&auction).await?;

    Ok(Json(AuctionDetailResponse { auction, item_data }))
}

/// Handler for GET /player/:name
///
/// Accepts a player name or uuid.
pub async fn player_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AuctionResult<Json<Value>> {
    let player = state.auctions.fetch_player(&state.api_key, &name).await?;
    Ok(Json(player))
}

/// Handler for GET /profile/:id
pub async fn profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AuctionResult<Json<Value>> {
    let profile = state.auctions.fetch_profile(&state.api_key, &id).await?;
    Ok(Json(profile))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
