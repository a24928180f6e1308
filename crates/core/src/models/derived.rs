use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A holding joined against the market snapshot at read time.
///
/// Never stored: every field past `entry_id` is recomputed from the holding
/// and its matching `CoinSnapshot` on each read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedAsset {
    pub id: String,
    pub amount: f64,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub entry_id: Uuid,

    /// Coin name from the snapshot; the coin id when the coin is not listed
    pub name: String,

    /// `purchase price < current price`
    pub grow: bool,

    /// Symmetric percentage difference between purchase and current price
    pub grow_percent: f64,

    /// amount × current price
    pub total_amount: f64,

    /// amount × current price − amount × purchase price
    pub total_profit: f64,
}

impl DerivedAsset {
    /// Current unit price implied by the valuation (0 for an empty position).
    pub fn current_price(&self) -> f64 {
        if self.amount == 0.0 {
            0.0
        } else {
            self.total_amount / self.amount
        }
    }
}

/// Aggregate figures over all derived holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Number of line items
    pub holdings: usize,

    /// Σ amount × current price
    pub total_value: f64,

    /// Σ amount × purchase price
    pub total_invested: f64,

    /// total_value − total_invested
    pub total_profit: f64,

    /// (total_profit / total_invested) × 100, or 0 with nothing invested
    pub total_profit_pct: f64,
}
