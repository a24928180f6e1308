use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::coin::MarketListing;
use crate::models::holding::AssetHolding;
use crate::models::settings::Settings;
use crate::providers::traits::MarketDataProvider;

use super::amounts::AmountSource;

/// Fetches market data and demo holdings, never failing the caller.
///
/// Fallback policy:
/// - **Market listing**: any provider error yields an empty listing.
/// - **Seed holdings**: any error yields the two fixed holdings from
///   [`fallback_holdings`].
///
/// Errors are logged with `tracing::warn!` and otherwise swallowed. There is
/// no retry; the next call simply tries again.
pub struct MarketService {
    provider: Box<dyn MarketDataProvider>,
    settings: Settings,
}

impl MarketService {
    pub fn new(provider: Box<dyn MarketDataProvider>, settings: Settings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Top `listing_limit` coins by market cap, normalized.
    pub async fn fetch_market_snapshot(&self) -> MarketListing {
        let limit = self.settings.listing_limit;
        match self
            .provider
            .get_markets(&self.settings.vs_currency, limit, 1)
            .await
        {
            Ok(coins) => {
                let listing = MarketListing::from_market(coins, limit);
                debug!(coins = listing.len(), "market snapshot fetched");
                listing
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Error fetching crypto data");
                MarketListing::empty(limit)
            }
        }
    }

    /// Demo holdings: the first `seed_count` of the top `seed_limit` coins,
    /// bought at their current price in quantities drawn from `amounts`.
    pub async fn fetch_seed_holdings(
        &self,
        amounts: &mut dyn AmountSource,
        now: DateTime<Utc>,
    ) -> Vec<AssetHolding> {
        match self.try_fetch_seed_holdings(amounts, now).await {
            Ok(holdings) => {
                debug!(holdings = holdings.len(), "seed holdings fetched");
                holdings
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Error fetching assets");
                fallback_holdings(now)
            }
        }
    }

    async fn try_fetch_seed_holdings(
        &self,
        amounts: &mut dyn AmountSource,
        now: DateTime<Utc>,
    ) -> Result<Vec<AssetHolding>, CoreError> {
        let coins = self
            .provider
            .get_markets(&self.settings.vs_currency, self.settings.seed_limit, 1)
            .await?;

        coins
            .into_iter()
            .take(self.settings.seed_count)
            .map(|coin| {
                let amount = amounts.next_amount()?;
                let price = coin.current_price.unwrap_or(0.0);
                Ok(AssetHolding::new(coin.id, amount, price, now))
            })
            .collect()
    }
}

/// Holdings used when the seed fetch fails.
pub fn fallback_holdings(now: DateTime<Utc>) -> Vec<AssetHolding> {
    vec![
        AssetHolding::new("bitcoin", 0.02, 26244.0, now),
        AssetHolding::new("ethereum", 5.0, 2400.0, now),
    ]
}
