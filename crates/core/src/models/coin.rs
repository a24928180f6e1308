use serde::{Deserialize, Serialize};

/// BTC/USD rate used for `price_btc` when the listing carries no bitcoin row.
pub const REFERENCE_BTC_PRICE_USD: f64 = 44870.39834657236;

/// Raw `/coins/markets` record as the upstream API returns it.
///
/// Every numeric field is optional: CoinGecko sends `null` for coins that
/// lack a rank, supply figures or a given change window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_1h_in_currency: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
    #[serde(default)]
    pub links: Option<MarketCoinLinks>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketCoinLinks {
    #[serde(default)]
    pub homepage: Vec<String>,
    #[serde(default)]
    pub blockchain_site: Vec<String>,
}

/// One row of market data at fetch time.
///
/// Immutable once built; a refresh replaces the whole `MarketListing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    /// Stable upstream identifier (e.g., "bitcoin")
    pub id: String,
    pub icon: String,
    pub name: String,
    /// Ticker symbol, always uppercased (e.g., "BTC")
    pub symbol: String,
    /// Market-cap order; 0 when upstream has no rank
    pub rank: u32,
    /// Spot price in USD
    pub price: f64,
    pub price_btc: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub available_supply: f64,
    pub total_supply: f64,
    pub price_change_1h: f64,
    pub price_change_1d: f64,
    pub price_change_1w: f64,
    pub reddit_url: String,
    pub website_url: String,
    pub twitter_url: String,
    pub explorers: Vec<String>,
}

impl CoinSnapshot {
    /// Normalize a raw upstream record. Missing numbers become 0.
    pub fn from_market(coin: MarketCoin, btc_price: f64) -> Self {
        let price = coin.current_price.unwrap_or(0.0);
        let price_btc = if btc_price > 0.0 { price / btc_price } else { 0.0 };
        let links = coin.links.unwrap_or_default();

        Self {
            reddit_url: format!("https://www.reddit.com/r/{}", coin.id),
            twitter_url: format!("https://twitter.com/{}", coin.id),
            website_url: links.homepage.into_iter().next().unwrap_or_default(),
            explorers: links.blockchain_site,
            icon: coin.image.unwrap_or_default(),
            symbol: coin.symbol.to_uppercase(),
            rank: coin.market_cap_rank.unwrap_or(0),
            price,
            price_btc,
            volume: coin.total_volume.unwrap_or(0.0),
            market_cap: coin.market_cap.unwrap_or(0.0),
            available_supply: coin.circulating_supply.unwrap_or(0.0),
            total_supply: coin.total_supply.unwrap_or(0.0),
            price_change_1h: coin.price_change_percentage_1h_in_currency.unwrap_or(0.0),
            price_change_1d: coin.price_change_percentage_24h.unwrap_or(0.0),
            price_change_1w: coin.price_change_percentage_7d_in_currency.unwrap_or(0.0),
            name: coin.name,
            id: coin.id,
        }
    }
}

/// Paging metadata attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingMeta {
    pub page: u32,
    pub limit: u32,
    pub item_count: usize,
    pub page_count: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

/// The full market snapshot: every tracked coin as of the last fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketListing {
    pub result: Vec<CoinSnapshot>,
    pub meta: ListingMeta,
}

impl MarketListing {
    /// Build a single-page listing from raw records, normalizing each one.
    ///
    /// `price_btc` is quoted against the listing's own bitcoin row when
    /// present, so it tracks the fetched BTC price rather than the fixed
    /// [`REFERENCE_BTC_PRICE_USD`]. The fixed rate is used only when the
    /// listing has no usable bitcoin row.
    pub fn from_market(coins: Vec<MarketCoin>, limit: u32) -> Self {
        let btc_price = coins
            .iter()
            .find(|c| c.id == "bitcoin")
            .and_then(|c| c.current_price)
            .filter(|p| *p > 0.0)
            .unwrap_or(REFERENCE_BTC_PRICE_USD);

        let result: Vec<CoinSnapshot> = coins
            .into_iter()
            .map(|c| CoinSnapshot::from_market(c, btc_price))
            .collect();

        Self {
            meta: ListingMeta {
                page: 1,
                limit,
                item_count: result.len(),
                page_count: 1,
                has_previous_page: false,
                has_next_page: false,
            },
            result,
        }
    }

    /// The listing returned when the upstream fetch fails.
    pub fn empty(limit: u32) -> Self {
        Self {
            result: Vec::new(),
            meta: ListingMeta {
                page: 1,
                limit,
                item_count: 0,
                page_count: 0,
                has_previous_page: false,
                has_next_page: false,
            },
        }
    }

    pub fn find(&self, id: &str) -> Option<&CoinSnapshot> {
        self.result.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.result.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}

impl Default for MarketListing {
    fn default() -> Self {
        Self::empty(0)
    }
}
