use rand::Rng;

use crate::errors::CoreError;

/// Upper bound (exclusive) of randomly generated demo amounts.
pub const DEMO_AMOUNT_SCALE: f64 = 10.0;

/// Source of quantities for demo seed holdings.
///
/// Seeding is the only non-deterministic step in the store; routing it through
/// this trait lets tests pin the amounts.
pub trait AmountSource: Send {
    /// Next demo quantity.
    fn next_amount(&mut self) -> Result<f64, CoreError>;
}

/// Thread-local random amounts uniformly distributed in `[0, DEMO_AMOUNT_SCALE)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAmounts;

impl AmountSource for RandomAmounts {
    fn next_amount(&mut self) -> Result<f64, CoreError> {
        Ok(rand::rng().random_range(0.0..DEMO_AMOUNT_SCALE))
    }
}

/// Replays a fixed list of amounts, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct FixedAmounts {
    values: Vec<f64>,
    next: usize,
}

impl FixedAmounts {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl AmountSource for FixedAmounts {
    fn next_amount(&mut self) -> Result<f64, CoreError> {
        if self.values.is_empty() {
            return Err(CoreError::Config("FixedAmounts has no values".into()));
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        Ok(value)
    }
}
