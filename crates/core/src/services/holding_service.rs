use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::AssetHolding;

/// Manages the holding set: validated appends and the two removal flavours.
/// No I/O.
pub struct HoldingService;

impl HoldingService {
    pub fn new() -> Self {
        Self
    }

    /// Append a holding as its own line item.
    /// Holdings of the same coin are never merged.
    pub fn add_holding(
        &self,
        holdings: &mut Vec<AssetHolding>,
        holding: AssetHolding,
    ) -> Result<(), CoreError> {
        self.validate_holding(&holding)?;
        holdings.push(holding);
        Ok(())
    }

    /// Remove every holding referencing `coin_id`. Returns how many went.
    ///
    /// Two purchases of the same coin are both removed; use
    /// [`HoldingService::remove_entry`] to drop a single line item.
    pub fn remove_by_coin(&self, holdings: &mut Vec<AssetHolding>, coin_id: &str) -> usize {
        let before = holdings.len();
        holdings.retain(|h| h.id != coin_id);
        before - holdings.len()
    }

    /// Remove exactly the line item with `entry_id`.
    pub fn remove_entry(
        &self,
        holdings: &mut Vec<AssetHolding>,
        entry_id: Uuid,
    ) -> Result<AssetHolding, CoreError> {
        let idx = holdings
            .iter()
            .position(|h| h.entry_id == entry_id)
            .ok_or_else(|| CoreError::HoldingNotFound(entry_id.to_string()))?;
        Ok(holdings.remove(idx))
    }

    /// Rules:
    /// - Coin id must be non-empty
    /// - Amount and purchase price must be finite and positive
    fn validate_holding(&self, holding: &AssetHolding) -> Result<(), CoreError> {
        if holding.id.trim().is_empty() {
            return Err(CoreError::ValidationError("Coin id must not be empty".into()));
        }
        if !holding.amount.is_finite() || holding.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be a positive number, got {}",
                holding.amount
            )));
        }
        if !holding.price.is_finite() || holding.price <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Purchase price must be a positive number, got {}",
                holding.price
            )));
        }
        Ok(())
    }
}

impl Default for HoldingService {
    fn default() -> Self {
        Self::new()
    }
}
