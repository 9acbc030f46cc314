//! Auction records
//!
//! Decoded view of an auction that the aggregation works on.

use serde::{Deserialize, Serialize};

use super::item::DecodedItem;
use crate::error::AuctionError;
use crate::upstream::Auction;

// == Auction Record ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRecord {
    pub id: String,
    /// Color-stripped display name from the decoded item payload
    pub item_identity: String,
    pub stack_size: u32,
    /// Unix milliseconds
    pub start_time: i64,
    /// Unix milliseconds
    pub end_time: i64,
    pub highest_bid_amount: u64,
    pub bid_count: usize,
}

impl AuctionRecord {
    pub fn from_parts(auction: &Auction, item: &DecodedItem) -> Self {
        Self {
            id: auction.uuid.clone(),
            item_identity: item.display_name.clone(),
            stack_size: item.stack_size,
            start_time: auction.start,
            end_time: auction.end,
            highest_bid_amount: auction.highest_bid_amount,
            bid_count: auction.bids.len(),
        }
    }

    /// Highest bid per item in the stack, rounded to the nearest coin.
    pub fn unit_price(&self) -> u64 {
        let stack = f64::from(self.stack_size.max(1));
        (self.highest_bid_amount as f64 / stack).round() as u64
    }

    pub fn has_bids(&self) -> bool {
        self.bid_count > 0
    }

    /// Whether the auction is still running at `now`.
    pub fn is_active_at(&self, now: i64) -> bool {
        self.end_time > now
    }

    /// Whether the auction ends within `window_ms` of `now`, including
    /// auctions that already ended.
    pub fn closes_within(&self, now: i64, window_ms: i64) -> bool {
        self.end_time - now <= window_ms
    }
}

// == Decoded Listing ==
/// Records decoded from a listing, with the auctions that could not be decoded.
#[derive(Debug, Default)]
pub struct DecodedListing {
    pub records: Vec<AuctionRecord>,
    pub failures: Vec<AuctionError>,
}

impl DecodedListing {
    /// Records still running at `now`.
    pub fn active_at(&self, now: i64) -> Vec<AuctionRecord> {
        self.records
            .iter()
            .filter(|record| record.is_active_at(now))
            .cloned()
            .collect()
    }
}
