//! Hypixel API client
//!
//! Fetches pages of the SkyBlock auction listing, players and profiles over
//! HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{is_player_uuid, AuctionPage, AuctionSource, PlayerResponse, ProfileResponse};
use crate::error::{AuctionError, AuctionResult};

/// Client for the auction, player and profile endpoints.
#[derive(Debug, Clone)]
pub struct HypixelClient {
    client: Client,
    base_url: String,
}

impl HypixelClient {
    /// Creates a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a client around an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Sends a GET to `{base}/{resource}` and parses the JSON body.
    ///
    /// Error payloads carry `success: false` and a cause, so the body is parsed
    /// regardless of the status code. Failures are returned as a cause string.
    async fn get_json<T: DeserializeOwned>(
        &self,
        api_key: &str,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, String> {
        let mut request = self
            .client
            .get(format!("{}/{}", self.base_url, resource))
            .query(query);
        if !api_key.is_empty() {
            request = request.header("API-Key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;
        let status = response.status();

        response
            .json::<T>()
            .await
            .map_err(|e| format!("unreadable response (HTTP {}): {}", status, e))
    }
}

#[async_trait]
impl AuctionSource for HypixelClient {
    async fn fetch_page(&self, api_key: &str, page: u32) -> AuctionResult<AuctionPage> {
        let number = page.to_string();
        self.get_json(api_key, "skyblock/auctions", &[("page", number.as_str())])
            .await
            .map_err(|cause| AuctionError::Upstream { page, cause })
    }

    async fn fetch_player(
        &self,
        api_key: &str,
        name_or_uuid: &str,
    ) -> AuctionResult<PlayerResponse> {
        let param = if is_player_uuid(name_or_uuid) { "uuid" } else { "name" };
        self.get_json(api_key, "player", &[(param, name_or_uuid)])
            .await
            .map_err(|cause| AuctionError::Api {
                resource: "player",
                cause,
            })
    }

    async fn fetch_profile(
        &self,
        api_key: &str,
        profile_id: &str,
    ) -> AuctionResult<ProfileResponse> {
        self.get_json(api_key, "skyblock/profile", &[("profile", profile_id)])
            .await
            .map_err(|cause| AuctionError::Api {
                resource: "profile",
                cause,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HypixelClient {
        HypixelClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/skyblock/auctions"))
            .and(query_param("page", "2"))
            .and(header("API-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "totalPages": 3,
                "auctions": [{"uuid": "a", "start": 0, "end": 10}]
            })))
            .mount(&server)
            .await;

        let page = client_for(&server).fetch_page("secret", 2).await.unwrap();

        assert!(page.success);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.auctions[0].uuid, "a");
    }

    #[tokio::test]
    async fn test_fetch_page_failure_body_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/skyblock/auctions"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "success": false,
                "cause": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let page = client_for(&server).fetch_page("bad", 0).await.unwrap();

        assert!(!page.success);
        assert_eq!(page.cause.as_deref(), Some("Invalid API key"));
    }

    #[tokio::test]
    async fn test_fetch_player_by_name_and_uuid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/player"))
            .and(query_param("name", "Notch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "player": {"displayname": "Notch"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/player"))
            .and(query_param("uuid", "069a79f444e94726a5befca90e38aaf5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "player": {"displayname": "Notch"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let by_name = client.fetch_player("k", "Notch").await.unwrap();
        let by_uuid = client
            .fetch_player("k", "069a79f444e94726a5befca90e38aaf5")
            .await
            .unwrap();

        assert_eq!(by_name.player, Some(json!({"displayname": "Notch"})));
        assert_eq!(by_uuid, by_name);
    }

    #[tokio::test]
    async fn test_fetch_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/skyblock/profile"))
            .and(query_param("profile", "p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "profile": {"profile_id": "p1"}
            })))
            .mount(&server)
            .await;

        let response = client_for(&server).fetch_profile("k", "p1").await.unwrap();

        assert_eq!(response.profile, Some(json!({"profile_id": "p1"})));
    }

    #[tokio::test]
    async fn test_fetch_profile_unreadable_body_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_profile("k", "p1").await.unwrap_err();

        assert!(matches!(err, AuctionError::Api { resource: "profile", .. }));
    }

    #[tokio::test]
    async fn test_fetch_page_unreadable_body_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_page("", 4).await.unwrap_err();

        assert!(matches!(err, AuctionError::Upstream { page: 4, .. }));
        assert!(err.to_string().contains("502"));
    }
}
