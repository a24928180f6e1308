use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::format::capitalize;
use super::SortOrder;
use crate::errors::CoreError;
use crate::models::derived::DerivedAsset;

/// Column the holdings table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldingSortField {
    Name,
    Amount,
    PurchasePrice,
    CurrentPrice,
    TotalAmount,
    TotalProfit,
    Date,
}

impl FromStr for HoldingSortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "name" => Ok(Self::Name),
            "amount" => Ok(Self::Amount),
            "purchaseprice" | "price" => Ok(Self::PurchasePrice),
            "currentprice" => Ok(Self::CurrentPrice),
            "totalamount" | "value" => Ok(Self::TotalAmount),
            "totalprofit" | "profit" => Ok(Self::TotalProfit),
            "date" => Ok(Self::Date),
            other => Err(CoreError::ValidationError(format!(
                "Unknown holding sort field: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingsTableQuery {
    /// `None` keeps the store's order
    pub sort_field: Option<HoldingSortField>,
    pub sort_order: SortOrder,
    /// `Some(true)` keeps growing positions only, `Some(false)` falling ones
    pub grow_filter: Option<bool>,
}

/// The holdings table with its header figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingsTable<'a> {
    pub rows: Vec<&'a DerivedAsset>,
    /// Holdings in the store, before filtering
    pub count: usize,
    /// Σ total_amount over all holdings, before filtering
    pub total_value: f64,
}

pub fn build_holdings_table<'a>(
    derived: &'a [DerivedAsset],
    query: &HoldingsTableQuery,
) -> HoldingsTable<'a> {
    let mut rows: Vec<&DerivedAsset> = derived
        .iter()
        .filter(|d| query.grow_filter.map_or(true, |g| d.grow == g))
        .collect();

    if let Some(field) = query.sort_field {
        rows.sort_by(|a, b| query.sort_order.apply(compare(a, b, field)));
    }

    HoldingsTable {
        rows,
        count: derived.len(),
        total_value: derived.iter().map(|d| d.total_amount).sum(),
    }
}

fn compare(a: &DerivedAsset, b: &DerivedAsset, field: HoldingSortField) -> Ordering {
    match field {
        HoldingSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        HoldingSortField::Amount => a.amount.total_cmp(&b.amount),
        HoldingSortField::PurchasePrice => a.price.total_cmp(&b.price),
        HoldingSortField::CurrentPrice => a.current_price().total_cmp(&b.current_price()),
        HoldingSortField::TotalAmount => a.total_amount.total_cmp(&b.total_amount),
        HoldingSortField::TotalProfit => a.total_profit.total_cmp(&b.total_profit),
        HoldingSortField::Date => a.date.cmp(&b.date),
    }
}

/// Side-panel card for one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingCard {
    pub entry_id: uuid::Uuid,
    pub coin_id: String,
    pub title: String,
    pub value: f64,
    pub trend_up: bool,
    pub total_profit: f64,
    pub amount: f64,
    pub difference_pct: f64,
}

pub fn holding_cards(derived: &[DerivedAsset]) -> Vec<HoldingCard> {
    derived
        .iter()
        .map(|d| HoldingCard {
            entry_id: d.entry_id,
            coin_id: d.id.clone(),
            title: capitalize(&d.id),
            value: d.total_amount,
            trend_up: d.grow,
            total_profit: d.total_profit,
            amount: d.amount,
            difference_pct: d.grow_percent,
        })
        .collect()
}
