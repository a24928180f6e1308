use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Runtime configuration for the market source and demo seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the CoinGecko v3 API (no trailing slash).
    pub base_url: String,

    /// Quote currency sent as `vs_currency`.
    pub vs_currency: String,

    /// How many coins the full market listing requests.
    pub listing_limit: u32,

    /// How many coins the seed-holdings request fetches.
    pub seed_limit: u32,

    /// How many of the fetched seed coins become holdings.
    pub seed_count: usize,

    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vs_currency: "usd".to_string(),
            listing_limit: 20,
            seed_limit: 10,
            seed_count: 5,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Defaults overridden by `COINGECKO_BASE_URL`, `PORTFOLIO_VS_CURRENCY`,
    /// `PORTFOLIO_LISTING_LIMIT`, `PORTFOLIO_SEED_LIMIT`, `PORTFOLIO_SEED_COUNT`
    /// and `PORTFOLIO_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup("COINGECKO_BASE_URL") {
            settings.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(currency) = lookup("PORTFOLIO_VS_CURRENCY") {
            settings.vs_currency = currency.to_lowercase();
        }
        if let Some(v) = lookup("PORTFOLIO_LISTING_LIMIT") {
            settings.listing_limit = parse_var("PORTFOLIO_LISTING_LIMIT", &v)?;
        }
        if let Some(v) = lookup("PORTFOLIO_SEED_LIMIT") {
            settings.seed_limit = parse_var("PORTFOLIO_SEED_LIMIT", &v)?;
        }
        if let Some(v) = lookup("PORTFOLIO_SEED_COUNT") {
            settings.seed_count = parse_var("PORTFOLIO_SEED_COUNT", &v)?;
        }
        if let Some(v) = lookup("PORTFOLIO_REQUEST_TIMEOUT_SECS") {
            settings.request_timeout_secs = parse_var("PORTFOLIO_REQUEST_TIMEOUT_SECS", &v)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the market source cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.is_empty() {
            return Err(CoreError::Config("base_url must not be empty".into()));
        }
        if self.vs_currency.is_empty() {
            return Err(CoreError::Config("vs_currency must not be empty".into()));
        }
        if self.listing_limit == 0 || self.seed_limit == 0 {
            return Err(CoreError::Config(
                "listing_limit and seed_limit must be at least 1".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config("request_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CoreError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CoreError::Config(format!("{key}={value}: {e}")))
}
