pub mod coin;
pub mod derived;
pub mod holding;
pub mod settings;
