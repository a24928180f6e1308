//! Valuation of holdings against a market snapshot.
//!
//! Pure functions with no I/O or state. Every figure the views show is
//! recomputed from (holding, snapshot) through here.

use crate::models::coin::MarketListing;
use crate::models::derived::{DerivedAsset, PortfolioSummary};
use crate::models::holding::AssetHolding;

/// Symmetric percentage difference between two prices, rounded to 2 decimals.
///
/// `100 × |a − b| / ((a + b) / 2)`. Always non-negative; the direction of the
/// move is carried by [`DerivedAsset::grow`]. Returns 0 when `a + b` is 0.
pub fn percent_difference(a: f64, b: f64) -> f64 {
    let mean = (a + b) / 2.0;
    if mean == 0.0 {
        return 0.0;
    }
    let pct = 100.0 * ((a - b) / mean).abs();
    (pct * 100.0).round() / 100.0
}

/// Join one holding with its coin in `snapshot`.
///
/// A holding whose coin is not listed values at 0 with `grow == false` and
/// takes its coin id as the display name.
pub fn derive_holding(holding: &AssetHolding, snapshot: &MarketListing) -> DerivedAsset {
    let coin = snapshot.find(&holding.id);

    let (name, grow, grow_percent, total_amount, total_profit) = match coin {
        Some(coin) => (
            coin.name.clone(),
            // Compares purchase < current; the cards colour on this flag alone.
            holding.price < coin.price,
            percent_difference(holding.price, coin.price),
            holding.amount * coin.price,
            holding.amount * coin.price - holding.cost(),
        ),
        None => (holding.id.clone(), false, 0.0, 0.0, 0.0),
    };

    DerivedAsset {
        id: holding.id.clone(),
        amount: holding.amount,
        price: holding.price,
        date: holding.date,
        entry_id: holding.entry_id,
        name,
        grow,
        grow_percent,
        total_amount,
        total_profit,
    }
}

/// Derive every holding, preserving order.
pub fn derive_holdings(holdings: &[AssetHolding], snapshot: &MarketListing) -> Vec<DerivedAsset> {
    holdings
        .iter()
        .map(|h| derive_holding(h, snapshot))
        .collect()
}

/// Σ amount × current price. Unlisted coins contribute 0.
pub fn portfolio_total_value(holdings: &[AssetHolding], snapshot: &MarketListing) -> f64 {
    holdings
        .iter()
        .map(|h| snapshot.find(&h.id).map_or(0.0, |c| h.amount * c.price))
        .sum()
}

/// Totals across derived holdings.
pub fn summarize(derived: &[DerivedAsset]) -> PortfolioSummary {
    let total_value: f64 = derived.iter().map(|d| d.total_amount).sum();
    let total_invested: f64 = derived.iter().map(|d| d.amount * d.price).sum();
    let total_profit = total_value - total_invested;
    let total_profit_pct = if total_invested > 0.0 {
        total_profit / total_invested * 100.0
    } else {
        0.0
    };

    PortfolioSummary {
        holdings: derived.len(),
        total_value,
        total_invested,
        total_profit,
        total_profit_pct,
    }
}
