use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user-entered position.
///
/// **Important**: `id` is the coin identifier, not a holding identity. Two
/// purchases of the same coin share it; `entry_id` tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHolding {
    /// Coin identifier, foreign key into the market snapshot (e.g., "bitcoin")
    pub id: String,

    /// Quantity held
    pub amount: f64,

    /// Purchase price per unit in USD, fixed at creation
    pub price: f64,

    /// Purchase timestamp, fixed at creation
    pub date: DateTime<Utc>,

    /// Identity of this line item
    pub entry_id: Uuid,
}

impl AssetHolding {
    pub fn new(id: impl Into<String>, amount: f64, price: f64, date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            amount,
            price,
            date,
            entry_id: Uuid::new_v4(),
        }
    }

    /// Amount paid for the position (amount × purchase price).
    pub fn cost(&self) -> f64 {
        self.amount * self.price
    }
}
