use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::MarketCoin;

/// Trait abstraction for market data sources.
///
/// The CoinGecko client implements it for real use; tests substitute canned
/// or failing sources. Implementations report failures as `Err`; turning those
/// into empty/fallback data is `MarketService`'s job.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Top `per_page` coins by market capitalization, quoted in `vs_currency`.
    async fn get_markets(
        &self,
        vs_currency: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<MarketCoin>, CoreError>;
}
