//! Upstream Module
//!
//! Wire types of the paged auction, player and profile endpoints and the
//! source abstraction the service fetches through.

mod hypixel;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuctionResult;

pub use hypixel::HypixelClient;

// == Wire Types ==
/// One page of the auction listing as returned by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuctionPage {
    pub success: bool,
    #[serde(default)]
    pub auctions: Vec<Auction>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// A raw auction listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub uuid: String,
    #[serde(default)]
    pub auctioneer: String,
    /// Display name as shown in the auction house, may contain `§` codes
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub item_lore: String,
    /// Base64 item payload
    #[serde(default)]
    pub item_bytes: String,
    /// Start time (Unix milliseconds)
    pub start: i64,
    /// End time (Unix milliseconds)
    pub end: i64,
    #[serde(default)]
    pub starting_bid: u64,
    #[serde(default)]
    pub highest_bid_amount: u64,
    #[serde(default)]
    pub bids: Vec<Bid>,
    #[serde(default)]
    pub bin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(default)]
    pub bidder: String,
    pub amount: u64,
    #[serde(default)]
    pub timestamp: i64,
}

/// Response of the `player` endpoint. The player record is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub success: bool,
    #[serde(default)]
    pub player: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Response of the `skyblock/profile` endpoint. The profile is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    #[serde(default)]
    pub profile: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Whether `name_or_uuid` is a Mojang uuid (32 hex digits, dashes allowed)
/// rather than a player name.
pub fn is_player_uuid(name_or_uuid: &str) -> bool {
    let digits: Vec<char> = name_or_uuid.chars().filter(|c| *c != '-').collect();
    digits.len() == 32 && digits.iter().all(char::is_ascii_hexdigit)
}

// == Auction Source ==
/// Anything that can serve pages of the auction listing.
#[async_trait]
pub trait AuctionSource: Send + Sync {
    /// Fetches one page. A response with `success == false` is returned as-is;
    /// only transport failures are errors here.
    async fn fetch_page(&self, api_key: &str, page: u32) -> AuctionResult<AuctionPage>;

    /// Fetches a player by name or uuid (see [`is_player_uuid`]).
    async fn fetch_player(&self, api_key: &str, name_or_uuid: &str)
        -> AuctionResult<PlayerResponse>;

    /// Fetches a SkyBlock profile by id.
    async fn fetch_profile(&self, api_key: &str, profile_id: &str)
        -> AuctionResult<ProfileResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserialize_ignores_unknown_fields() {
        let json = r#"{
            "success": true,
            "page": 0,
            "totalPages": 2,
            "totalAuctions": 1,
            "lastUpdated": 1600000000000,
            "auctions": [{
                "uuid": "a1",
                "auctioneer": "p1",
                "profile_id": "p1",
                "item_name": "§6Hyperion",
                "item_bytes": "H4sI",
                "start": 1,
                "end": 2,
                "highest_bid_amount": 50,
                "bids": [{"auction_id": "a1", "bidder": "p2", "amount": 50, "timestamp": 1}],
                "claimed": false
            }]
        }"#;

        let page: AuctionPage = serde_json::from_str(json).unwrap();
        assert!(page.success);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.auctions[0].bids.len(), 1);
        assert_eq!(page.auctions[0].highest_bid_amount, 50);
    }

    #[test]
    fn test_player_uuid_detection() {
        assert!(is_player_uuid("069a79f444e94726a5befca90e38aaf5"));
        assert!(is_player_uuid("069a79f4-44e9-4726-a5be-fca90e38aaf5"));
        assert!(!is_player_uuid("Notch"));
        assert!(!is_player_uuid("069a79f444e94726a5befca90e38aafz"));
    }

    #[test]
    fn test_unknown_player_deserializes_to_none() {
        let response: PlayerResponse =
            serde_json::from_str(r#"{"success": true, "player": null}"#).unwrap();
        assert!(response.success);
        assert!(response.player.is_none());
    }

    #[test]
    fn test_failed_page_carries_cause() {
        let page: AuctionPage =
            serde_json::from_str(r#"{"success": false, "cause": "Invalid API key"}"#).unwrap();
        assert!(!page.success);
        assert!(page.auctions.is_empty());
        assert_eq!(page.cause.as_deref(), Some("Invalid API key"));
    }
}
