//! Price aggregation
//!
//! Groups auction records by item identity and computes per-unit bid statistics.
//!
//! # Closing-soon rule
//! When at least one bid auction of an item ends within the next ten minutes,
//! only those auctions feed the average sell price. Otherwise every bid auction
//! does. Extremes always consider every bid auction of the item.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::record::AuctionRecord;
use crate::cache::current_timestamp_ms;

/// Closing-soon window in milliseconds.
pub const CLOSING_SOON_WINDOW_MS: i64 = 10 * 60 * 1000;

// == Item Price Summary ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPriceSummary {
    pub display_name: String,
    pub unit_sell_price: u64,
    pub highest_unit_bid: u64,
    pub lowest_unit_bid: u64,
    pub active_listing_count: usize,
}

#[derive(Default)]
struct Group<'a> {
    listing_count: usize,
    bid_records: Vec<&'a AuctionRecord>,
}

/// Summarizes `records` against the current time.
pub fn summarize(records: &[AuctionRecord]) -> Vec<ItemPriceSummary> {
    summarize_at(records, current_timestamp_ms())
}

/// Summarizes `records` as seen at `now` (Unix milliseconds).
///
/// Output is sorted by display name with [`collate`].
pub fn summarize_at(records: &[AuctionRecord], now: i64) -> Vec<ItemPriceSummary> {
    let mut groups: HashMap<&str, Group<'_>> = HashMap::new();
    for record in records {
        let group = groups.entry(record.item_identity.as_str()).or_default();
        group.listing_count += 1;
        if record.has_bids() {
            group.bid_records.push(record);
        }
    }

    let mut summaries: Vec<ItemPriceSummary> = groups
        .into_iter()
        .filter_map(|(name, group)| summarize_group(name, &group, now))
        .collect();
    summaries.sort_by(|a, b| collate(&a.display_name, &b.display_name));
    summaries
}

fn summarize_group(name: &str, group: &Group<'_>, now: i64) -> Option<ItemPriceSummary> {
    let bids = &group.bid_records;
    if bids.is_empty() {
        return None;
    }

    let any_closing_soon = bids
        .iter()
        .any(|record| record.closes_within(now, CLOSING_SOON_WINDOW_MS));

    let mut sum: u128 = 0;
    let mut contributing: u64 = 0;
    let mut highest: u64 = 0;
    let mut lowest: Option<u64> = None;

    for record in bids {
        let unit = record.unit_price();
        if !any_closing_soon || record.closes_within(now, CLOSING_SOON_WINDOW_MS) {
            sum += u128::from(unit);
            contributing += 1;
        }
        highest = highest.max(unit);
        if unit > 0 {
            lowest = Some(lowest.map_or(unit, |current| current.min(unit)));
        }
    }

    let lowest = lowest?;
    if highest == 0 || sum == 0 {
        return None;
    }

    Some(ItemPriceSummary {
        display_name: name.to_string(),
        unit_sell_price: (sum as f64 / contributing as f64).round() as u64,
        highest_unit_bid: highest,
        lowest_unit_bid: lowest,
        active_listing_count: group.listing_count,
    })
}

/// Locale-style string ordering.
///
/// Compares case-insensitively first, then puts lowercase before uppercase at
/// the first position where the case differs. Remaining ties fall back to code
/// point order, so only identical strings compare `Equal`.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    let case_a = a.chars().map(|c| !c.is_lowercase());
    let case_b = b.chars().map(|c| !c.is_lowercase());
    folded_a
        .cmp(folded_b)
        .then_with(|| case_a.cmp(case_b))
        .then_with(|| a.cmp(b))
}
