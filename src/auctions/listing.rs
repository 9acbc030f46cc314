//! Per-item listing rows

use serde::{Deserialize, Serialize};

use super::record::AuctionRecord;

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

// == Listing Row ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow {
    /// `"<name> (x<stack size>)"`
    pub display_name: String,
    pub auction_id: String,
    /// Highest bid per item in the stack
    pub current_bid: u64,
    pub bids: usize,
    /// Time remaining, or `N/A` once the auction ended
    pub end: String,
}

impl ListingRow {
    pub fn from_record(record: &AuctionRecord, now: i64) -> Self {
        Self {
            display_name: format!("{} (x{})", record.item_identity, record.stack_size),
            auction_id: record.id.clone(),
            current_bid: record.unit_price(),
            bids: record.bid_count,
            end: format_remaining(now, record.end_time),
        }
    }
}

// == Item Listing ==
/// Everything shown for a single item: rows for its running auctions and rows
/// for every auction of it that received bids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemListing {
    pub name: String,
    pub auctions: Vec<ListingRow>,
    pub auctions_raw: Vec<ListingRow>,
    pub auctions_count: usize,
    pub auctions_raw_count: usize,
}

impl ItemListing {
    /// Selects the records of `name` out of the full decoded listing.
    pub fn build(name: &str, records: &[AuctionRecord], now: i64) -> Self {
        let matching: Vec<&AuctionRecord> = records
            .iter()
            .filter(|record| record.item_identity == name)
            .collect();

        let auctions = listing_rows(
            matching.iter().copied().filter(|record| record.is_active_at(now)),
            now,
        );
        let auctions_raw = listing_rows(
            matching.iter().copied().filter(|record| record.has_bids()),
            now,
        );

        Self {
            name: name.to_string(),
            auctions_count: auctions.len(),
            auctions_raw_count: matching.len(),
            auctions,
            auctions_raw,
        }
    }
}

/// Builds one row per record, keeping input order.
pub fn listing_rows<'a>(
    records: impl IntoIterator<Item = &'a AuctionRecord>,
    now: i64,
) -> Vec<ListingRow> {
    records
        .into_iter()
        .map(|record| ListingRow::from_record(record, now))
        .collect()
}

/// Formats the time from `now` until `end` as `1d2h3m4s`.
///
/// Leading zero units are left out; seconds are always shown. Returns `N/A`
/// when `end` is in the past.
pub fn format_remaining(now: i64, end: i64) -> String {
    if end < now {
        return "N/A".to_string();
    }

    let mut remaining = end - now;
    let days = remaining / DAY_MS;
    remaining %= DAY_MS;
    let hours = remaining / HOUR_MS;
    remaining %= HOUR_MS;
    let minutes = remaining / MINUTE_MS;
    remaining %= MINUTE_MS;
    let seconds = remaining / SECOND_MS;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{}d", days));
    }
    if days > 0 || hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", seconds));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0, 4 * SECOND_MS), "4s");
        assert_eq!(format_remaining(0, 3 * MINUTE_MS + 999), "3m0s");
        assert_eq!(format_remaining(0, 2 * HOUR_MS + 5 * SECOND_MS), "2h0m5s");
        assert_eq!(
            format_remaining(0, DAY_MS + 2 * HOUR_MS + 3 * MINUTE_MS + 4 * SECOND_MS),
            "1d2h3m4s"
        );
        assert_eq!(format_remaining(0, DAY_MS), "1d0h0m0s");
        assert_eq!(format_remaining(10, 10), "0s");
    }

    #[test]
    fn test_format_remaining_after_end() {
        assert_eq!(format_remaining(1_000, 999), "N/A");
    }

    #[test]
    fn test_item_listing_selects_by_identity() {
        let base = AuctionRecord {
            id: "1".to_string(),
            item_identity: "Hyperion".to_string(),
            stack_size: 1,
            start_time: 0,
            end_time: 10 * MINUTE_MS,
            highest_bid_amount: 0,
            bid_count: 0,
        };
        let records = vec![
            base.clone(),
            AuctionRecord {
                id: "2".to_string(),
                end_time: -MINUTE_MS,
                highest_bid_amount: 500,
                bid_count: 2,
                ..base.clone()
            },
            AuctionRecord {
                id: "3".to_string(),
                item_identity: "Dirt".to_string(),
                ..base.clone()
            },
        ];

        let listing = ItemListing::build("Hyperion", &records, 0);

        assert_eq!(listing.auctions_count, 1);
        assert_eq!(listing.auctions[0].auction_id, "1");
        assert_eq!(listing.auctions_raw_count, 2);
        assert_eq!(listing.auctions_raw.len(), 1);
        assert_eq!(listing.auctions_raw[0].end, "N/A");
        assert_eq!(listing.auctions_raw[0].current_bid, 500);
    }

    #[test]
    fn test_listing_rows() {
        let record = AuctionRecord {
            id: "abc".to_string(),
            item_identity: "Enchanted Diamond".to_string(),
            stack_size: 64,
            start_time: 0,
            end_time: 90 * SECOND_MS,
            highest_bid_amount: 6_400,
            bid_count: 3,
        };

        let rows = listing_rows(&[record], 0);

        assert_eq!(
            rows,
            vec![ListingRow {
                display_name: "Enchanted Diamond (x64)".to_string(),
                auction_id: "abc".to_string(),
                current_bid: 100,
                bids: 3,
                end: "1m30s".to_string(),
            }]
        );
    }
}
