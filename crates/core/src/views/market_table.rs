use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::SortOrder;
use crate::errors::CoreError;
use crate::models::coin::{CoinSnapshot, MarketListing};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Column the market table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSortField {
    #[default]
    Rank,
    Name,
    Symbol,
    Price,
    PriceChange1h,
    PriceChange1d,
    PriceChange1w,
    MarketCap,
    Volume,
    AvailableSupply,
}

impl FromStr for MarketSortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "rank" => Ok(Self::Rank),
            "name" => Ok(Self::Name),
            "symbol" => Ok(Self::Symbol),
            "price" => Ok(Self::Price),
            "pricechange1h" | "1h" => Ok(Self::PriceChange1h),
            "pricechange1d" | "1d" | "24h" => Ok(Self::PriceChange1d),
            "pricechange1w" | "1w" | "7d" => Ok(Self::PriceChange1w),
            "marketcap" => Ok(Self::MarketCap),
            "volume" => Ok(Self::Volume),
            "availablesupply" | "supply" => Ok(Self::AvailableSupply),
            other => Err(CoreError::ValidationError(format!(
                "Unknown market sort field: {other}"
            ))),
        }
    }
}

/// Search, sort and paging state of the market table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTableQuery {
    /// Case-insensitive substring matched against name or symbol
    pub search: String,
    pub sort_field: MarketSortField,
    pub sort_order: SortOrder,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for MarketTableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_field: MarketSortField::Rank,
            sort_order: SortOrder::Ascending,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One rendered page of the market table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketTablePage<'a> {
    pub rows: Vec<&'a CoinSnapshot>,
    /// Coins in the snapshot
    pub total_count: usize,
    /// Coins passing the search filter
    pub matching_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    /// 1-based inclusive row range shown, `(0, 0)` when empty
    pub range: (usize, usize),
}

/// Filter, sort and paginate the market snapshot.
///
/// Out-of-range pages are clamped to the nearest valid page and a zero page
/// size falls back to [`DEFAULT_PAGE_SIZE`].
pub fn build_market_page<'a>(listing: &'a MarketListing, query: &MarketTableQuery) -> MarketTablePage<'a> {
    let needle = query.search.trim().to_lowercase();
    let mut rows: Vec<&CoinSnapshot> = listing
        .result
        .iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || c.symbol.to_lowercase().contains(&needle)
        })
        .collect();

    rows.sort_by(|a, b| query.sort_order.apply(compare(a, b, query.sort_field)));

    let matching_count = rows.len();
    let page_size = if query.page_size == 0 { DEFAULT_PAGE_SIZE } else { query.page_size };
    let page_count = matching_count.div_ceil(page_size);
    let page = query.page.clamp(1, page_count.max(1));

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(matching_count);
    let rows: Vec<&CoinSnapshot> = if start < end { rows[start..end].to_vec() } else { Vec::new() };
    let range = if rows.is_empty() { (0, 0) } else { (start + 1, end) };

    MarketTablePage {
        rows,
        total_count: listing.len(),
        matching_count,
        page,
        page_size,
        page_count,
        range,
    }
}

fn compare(a: &CoinSnapshot, b: &CoinSnapshot, field: MarketSortField) -> Ordering {
    match field {
        MarketSortField::Rank => a.rank.cmp(&b.rank),
        MarketSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        MarketSortField::Symbol => a.symbol.to_lowercase().cmp(&b.symbol.to_lowercase()),
        MarketSortField::Price => a.price.total_cmp(&b.price),
        MarketSortField::PriceChange1h => a.price_change_1h.total_cmp(&b.price_change_1h),
        MarketSortField::PriceChange1d => a.price_change_1d.total_cmp(&b.price_change_1d),
        MarketSortField::PriceChange1w => a.price_change_1w.total_cmp(&b.price_change_1w),
        MarketSortField::MarketCap => a.market_cap.total_cmp(&b.market_cap),
        MarketSortField::Volume => a.volume.total_cmp(&b.volume),
        MarketSortField::AvailableSupply => a.available_supply.total_cmp(&b.available_supply),
    }
}

/// Entry of the header's coin selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinOption {
    pub label: String,
    pub value: String,
    pub icon: String,
}

/// Selector options in listing order.
pub fn coin_options(listing: &MarketListing) -> Vec<CoinOption> {
    listing
        .result
        .iter()
        .map(|c| CoinOption {
            label: c.name.clone(),
            value: c.id.clone(),
            icon: c.icon.clone(),
        })
        .collect()
}
