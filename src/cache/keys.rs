//! Cache Keys
//!
//! Stable key names and time-to-live values for every cached resource.

/// One hour in milliseconds.
pub const HOUR_MS: u64 = 60 * 60 * 1000;

/// One day in milliseconds.
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Merged listing of every auction page.
pub const ALL_AUCTIONS: &str = "skyblock/auctions/all";

/// Memoized index summary.
pub const ROUTES_INDEX: &str = "routes:/index";

/// TTL of raw pages and the merged listing.
pub const AUCTIONS_TTL_MS: u64 = HOUR_MS;

/// TTL of the memoized index summary.
pub const ROUTES_INDEX_TTL_MS: u64 = HOUR_MS;

/// TTL of decoded item payloads; a payload never changes for an auction.
pub const ITEM_TTL_MS: u64 = DAY_MS;

/// TTL of player records.
pub const PLAYER_TTL_MS: u64 = DAY_MS;

/// TTL of SkyBlock profiles.
pub const PROFILE_TTL_MS: u64 = HOUR_MS;

/// Key of a single raw auction page.
pub fn auction_page(page: u32) -> String {
    format!("skyblock/auctions/?page={}", page)
}

/// Key of the decoded item payload of an auction.
pub fn item(auction_id: &str) -> String {
    format!("item:{}", auction_id)
}

/// Key of a player looked up by name or uuid.
pub fn player(name_or_uuid: &str) -> String {
    format!("player:{}", name_or_uuid)
}

/// Key of a SkyBlock profile.
pub fn profile(profile_id: &str) -> String {
    format!("sbprofile:{}", profile_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct_per_parameter() {
        assert_eq!(auction_page(0), "skyblock/auctions/?page=0");
        assert_ne!(auction_page(1), auction_page(10));
        assert_eq!(item("abc"), "item:abc");
        assert_eq!(player("Notch"), "player:Notch");
        assert_eq!(profile("abc"), "sbprofile:abc");
    }
}
