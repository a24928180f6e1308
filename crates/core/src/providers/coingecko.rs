use async_trait::async_trait;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::coin::MarketCoin;
use crate::models::settings::DEFAULT_BASE_URL;

const PROVIDER_NAME: &str = "CoinGecko";

/// CoinGecko API provider for the coins-by-market-cap listing.
///
/// - **Free**: No API key required (public tier is rate limited).
/// - **Endpoint**: `/coins/markets?vs_currency=..&order=market_cap_desc&per_page=N&page=P`
///
/// CoinGecko ids are lowercase slugs like "bitcoin", "ethereum"; they are
/// also the keys holdings use to reference a coin.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, 30)
    }

    /// Point the provider at another API root (mirror, proxy, or test server).
    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full listing URL for one page of the market-cap ranking.
    pub fn markets_url(&self, vs_currency: &str, per_page: u32, page: u32) -> String {
        format!(
            "{}/coins/markets?vs_currency={vs_currency}&order=market_cap_desc&per_page={per_page}&page={page}&sparkline=false&locale=en",
            self.base_url
        )
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_markets(
        &self,
        vs_currency: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<MarketCoin>, CoreError> {
        let url = self.markets_url(vs_currency, per_page, page);
        debug!(per_page, page, "requesting CoinGecko market listing");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP error! status: {}", status.as_u16()),
            });
        }

        let coins: Vec<MarketCoin> = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse market listing: {e}"),
        })?;

        debug!(count = coins.len(), "CoinGecko market listing received");
        Ok(coins)
    }
}
