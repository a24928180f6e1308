pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod views;

use chrono::{DateTime, Utc};
use models::{
    coin::{CoinSnapshot, MarketListing},
    derived::{DerivedAsset, PortfolioSummary},
    holding::AssetHolding,
    settings::Settings,
};
use providers::{coingecko::CoinGeckoProvider, traits::MarketDataProvider};
use services::{
    amounts::{AmountSource, RandomAmounts},
    holding_service::HoldingService,
    market_service::MarketService,
    valuation_service,
};
use tracing::info;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the crypto-portfolio core library.
///
/// Owns the holding set and the latest market snapshot. Callers keep the store
/// and hand `&AssetStore` to whatever renders it; there is no global instance.
/// Mutations take `&mut self`, so one mutation runs at a time.
#[must_use]
pub struct AssetStore {
    holdings: Vec<AssetHolding>,
    market: MarketListing,
    market_service: MarketService,
    holding_service: HoldingService,
    amounts: Box<dyn AmountSource>,
    loading: bool,
    /// Bumped on every change views may need to re-render for.
    revision: u64,
}

/// Holds the loading flag up for the duration of a fetch and lowers it on
/// drop, so a cancelled `initialize`/`refresh_market` future leaves it false.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn set(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("holdings", &self.holdings.len())
            .field("coins", &self.market.len())
            .field("provider", &self.market_service.provider_name())
            .field("loading", &self.loading)
            .field("revision", &self.revision)
            .finish()
    }
}

impl AssetStore {
    /// Store backed by CoinGecko with random demo amounts.
    pub fn new(settings: Settings) -> Self {
        let provider = CoinGeckoProvider::with_base_url(
            settings.base_url.clone(),
            settings.request_timeout_secs,
        );
        Self::with_provider(settings, Box::new(provider), Box::new(RandomAmounts))
    }

    /// Store with an injected market source and amount source.
    pub fn with_provider(
        settings: Settings,
        provider: Box<dyn MarketDataProvider>,
        amounts: Box<dyn AmountSource>,
    ) -> Self {
        Self {
            holdings: Vec::new(),
            market: MarketListing::empty(settings.listing_limit),
            market_service: MarketService::new(provider, settings),
            holding_service: HoldingService::new(),
            amounts,
            loading: false,
            revision: 0,
        }
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// First load: market snapshot, then seed holdings, then the join.
    ///
    /// Replaces any existing holdings. Never fails; upstream errors leave an
    /// empty snapshot and/or the fallback holdings.
    pub async fn initialize(&mut self) -> (Vec<DerivedAsset>, &MarketListing) {
        self.initialize_at(Utc::now()).await
    }

    /// [`AssetStore::initialize`] with an explicit purchase timestamp for seeds.
    pub async fn initialize_at(
        &mut self,
        now: DateTime<Utc>,
    ) -> (Vec<DerivedAsset>, &MarketListing) {
        let loading = LoadingGuard::set(&mut self.loading);

        let market = self.market_service.fetch_market_snapshot().await;
        let seeds = self
            .market_service
            .fetch_seed_holdings(self.amounts.as_mut(), now)
            .await;
        drop(loading);

        info!(coins = market.len(), holdings = seeds.len(), "portfolio initialized");
        self.market = market;
        self.holdings = seeds;
        self.revision += 1;

        (self.derived_holdings(), &self.market)
    }

    /// Replace the market snapshot wholesale. Holdings are kept as they are.
    pub async fn refresh_market(&mut self) -> &MarketListing {
        let loading = LoadingGuard::set(&mut self.loading);
        let market = self.market_service.fetch_market_snapshot().await;
        drop(loading);

        self.market = market;
        self.revision += 1;
        &self.market
    }

    // ── Holding Management ──────────────────────────────────────────

    /// Append a holding as a new line item and return the re-derived set.
    ///
    /// Valued against the snapshot already held; no fetch happens.
    pub fn add_holding(&mut self, holding: AssetHolding) -> Result<Vec<DerivedAsset>, CoreError> {
        self.holding_service.add_holding(&mut self.holdings, holding)?;
        self.revision += 1;
        Ok(self.derived_holdings())
    }

    /// Remove every holding of `coin_id`; returns how many were removed.
    pub fn remove_holding(&mut self, coin_id: &str) -> usize {
        let removed = self.holding_service.remove_by_coin(&mut self.holdings, coin_id);
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }

    /// Remove the single line item `entry_id`.
    pub fn remove_entry(&mut self, entry_id: Uuid) -> Result<AssetHolding, CoreError> {
        let removed = self.holding_service.remove_entry(&mut self.holdings, entry_id)?;
        self.revision += 1;
        Ok(removed)
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Raw holdings in insertion order.
    #[must_use]
    pub fn holdings(&self) -> &[AssetHolding] {
        &self.holdings
    }

    /// Holdings joined against the current snapshot, recomputed on each call.
    #[must_use]
    pub fn derived_holdings(&self) -> Vec<DerivedAsset> {
        valuation_service::derive_holdings(&self.holdings, &self.market)
    }

    #[must_use]
    pub fn market(&self) -> &MarketListing {
        &self.market
    }

    #[must_use]
    pub fn find_coin(&self, id: &str) -> Option<&CoinSnapshot> {
        self.market.find(id)
    }

    #[must_use]
    pub fn total_value(&self) -> f64 {
        valuation_service::portfolio_total_value(&self.holdings, &self.market)
    }

    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        valuation_service::summarize(&self.derived_holdings())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Changes whenever holdings or the snapshot change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.market_service.settings()
    }
}
