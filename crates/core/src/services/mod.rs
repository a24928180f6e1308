pub mod amounts;
pub mod holding_service;
pub mod market_service;
pub mod valuation_service;
