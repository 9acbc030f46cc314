//! Auction Service
//!
//! Fetches the paged listing, players and profiles through an
//! [`AuctionSource`], merges the listing, decodes item payloads and memoizes
//! every step in the shared cache.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::item::{self, DecodedItem};
use super::record::{AuctionRecord, DecodedListing};
use crate::cache::{current_timestamp_ms, keys, SharedCache};
use crate::error::{AuctionError, AuctionResult};
use crate::upstream::{Auction, AuctionPage, AuctionSource};

/// Upper bound on `totalPages` accepted from the upstream listing.
pub const MAX_PAGES: u32 = 1_000;

// == Auction Service ==
pub struct AuctionService {
    source: Arc<dyn AuctionSource>,
    cache: SharedCache,
    request_timeout: Duration,
}

/// A page together with whether it came from upstream during this call.
struct LoadedPage {
    number: u32,
    page: AuctionPage,
    fresh: bool,
}

impl AuctionService {
    /// Creates a service reading through `source`; each upstream request is
    /// bounded by `request_timeout`.
    pub fn new(source: Arc<dyn AuctionSource>, cache: SharedCache, request_timeout: Duration) -> Self {
        Self {
            source,
            cache,
            request_timeout,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Listing ==
    /// Returns the merged listing across all pages, cached for an hour.
    pub async fn fetch_all_auctions(&self, api_key: &str) -> AuctionResult<Vec<Auction>> {
        self.cache
            .cached(keys::ALL_AUCTIONS, keys::AUCTIONS_TTL_MS, || {
                self.fetch_all_uncached(api_key)
            })
            .await
    }

    /// Returns the auctions of the merged listing that have not ended yet.
    pub async fn fetch_active_auctions(&self, api_key: &str) -> AuctionResult<Vec<Auction>> {
        let now = current_timestamp_ms();
        let auctions = self.fetch_all_auctions(api_key).await?;
        Ok(auctions.into_iter().filter(|a| a.end > now).collect())
    }

    /// Looks up a single auction in the merged listing.
    pub async fn find_auction(&self, api_key: &str, id: &str) -> AuctionResult<Auction> {
        self.fetch_all_auctions(api_key)
            .await?
            .into_iter()
            .find(|auction| auction.uuid == id)
            .ok_or_else(|| AuctionError::AuctionNotFound(id.to_string()))
    }

    async fn fetch_all_uncached(&self, api_key: &str) -> AuctionResult<Vec<Auction>> {
        let first = self.load_page(api_key, 0).await?;
        let total_pages = first.page.total_pages.max(1);
        if total_pages > MAX_PAGES {
            return Err(AuctionError::Upstream {
                page: 0,
                cause: format!(
                    "implausible page count {} (limit {})",
                    total_pages, MAX_PAGES
                ),
            });
        }

        let rest = try_join_all((1..total_pages).map(|number| self.load_page(api_key, number))).await?;

        let mut pages = Vec::with_capacity(total_pages as usize);
        pages.push(first);
        pages.extend(rest);

        // Only reached once every page succeeded
        for loaded in pages.iter().filter(|loaded| loaded.fresh) {
            self.cache
                .set_as(&keys::auction_page(loaded.number), &loaded.page, keys::AUCTIONS_TTL_MS)
                .await?;
        }

        let fetched = pages.iter().filter(|loaded| loaded.fresh).count();
        let merged = merge_pages(pages);
        info!(
            "Merged {} auctions from {} pages ({} fetched from upstream)",
            merged.len(),
            total_pages,
            fetched
        );
        Ok(merged)
    }

    async fn load_page(&self, api_key: &str, number: u32) -> AuctionResult<LoadedPage> {
        if let Some(page) = self.cache.get_as::<AuctionPage>(&keys::auction_page(number)).await {
            debug!("Using cached auction page {}", number);
            return Ok(LoadedPage {
                number,
                page,
                fresh: false,
            });
        }

        let page = self.request_page(api_key, number).await?;
        Ok(LoadedPage {
            number,
            page,
            fresh: true,
        })
    }

    async fn request_page(&self, api_key: &str, number: u32) -> AuctionResult<AuctionPage> {
        let page = self
            .bounded(self.source.fetch_page(api_key, number), |cause| {
                AuctionError::Upstream {
                    page: number,
                    cause,
                }
            })
            .await?;

        if !page.success {
            return Err(AuctionError::Upstream {
                page: number,
                cause: page.cause.unwrap_or_else(|| "unknown".to_string()),
            });
        }
        Ok(page)
    }

    /// Runs an upstream request under the per-request timeout.
    async fn bounded<T, Fut>(
        &self,
        request: Fut,
        on_timeout: impl FnOnce(String) -> AuctionError,
    ) -> AuctionResult<T>
    where
        Fut: Future<Output = AuctionResult<T>>,
    {
        tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| {
                on_timeout(format!(
                    "timed out after {}s",
                    self.request_timeout.as_secs_f64()
                ))
            })?
    }

    // == Players and Profiles ==
    /// Returns the player record for a name or uuid, cached for a day.
    pub async fn fetch_player(&self, api_key: &str, name_or_uuid: &str) -> AuctionResult<Value> {
        self.cache
            .cached(&keys::player(name_or_uuid), keys::PLAYER_TTL_MS, || async move {
                let api = |cause: String| AuctionError::Api {
                    resource: "player",
                    cause,
                };
                let response = self
                    .bounded(self.source.fetch_player(api_key, name_or_uuid), api)
                    .await?;
                if !response.success {
                    return Err(api(response.cause.unwrap_or_else(|| "unknown".to_string())));
                }
                info!("Fetched player {}", name_or_uuid);
                present(response.player, "player", name_or_uuid)
            })
            .await
    }

    /// Returns a SkyBlock profile, cached for an hour.
    pub async fn fetch_profile(&self, api_key: &str, profile_id: &str) -> AuctionResult<Value> {
        self.cache
            .cached(&keys::profile(profile_id), keys::PROFILE_TTL_MS, || async move {
                let api = |cause: String| AuctionError::Api {
                    resource: "profile",
                    cause,
                };
                let response = self
                    .bounded(self.source.fetch_profile(api_key, profile_id), api)
                    .await?;
                if !response.success {
                    return Err(api(response.cause.unwrap_or_else(|| "unknown".to_string())));
                }
                info!("Fetched profile {}", profile_id);
                present(response.profile, "profile", profile_id)
            })
            .await
    }

    // == Items ==
    /// Decodes an auction's item payload, cached for a day per auction.
    pub async fn decode_item(&self, auction: &Auction) -> AuctionResult<DecodedItem> {
        self.cache
            .cached(&keys::item(&auction.uuid), keys::ITEM_TTL_MS, || async move {
                item::decode_item(&auction.item_bytes).map_err(|reason| AuctionError::ItemDecode {
                    auction_id: auction.uuid.clone(),
                    reason,
                })
            })
            .await
    }

    /// Decodes every auction, setting aside the ones that fail.
    pub async fn decode_records(&self, auctions: &[Auction]) -> DecodedListing {
        let mut listing = DecodedListing::default();
        for auction in auctions {
            match self.decode_item(auction).await {
                Ok(item) => listing.records.push(AuctionRecord::from_parts(auction, &item)),
                Err(err) => {
                    warn!("Skipping auction {}: {}", auction.uuid, err);
                    listing.failures.push(err);
                }
            }
        }
        listing
    }
}

/// A `null` or missing record means the upstream knows no such resource.
fn present(record: Option<Value>, resource: &'static str, id: &str) -> AuctionResult<Value> {
    record
        .filter(|value| !value.is_null())
        .ok_or_else(|| AuctionError::ResourceNotFound {
            resource,
            id: id.to_string(),
        })
}

/// Concatenates pages in page order, keeping the first occurrence of each id.
fn merge_pages(pages: Vec<LoadedPage>) -> Vec<Auction> {
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flat_map(|loaded| loaded.page.auctions)
        .filter(|auction| seen.insert(auction.uuid.clone()))
        .collect()
}
