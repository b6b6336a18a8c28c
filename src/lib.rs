pub mod actions;
pub mod config;
pub mod crops;
pub mod error;
pub mod learning;
pub mod simulation;
pub mod state;
pub mod weather;

pub use actions::Action;
pub use error::FarmError;
pub use state::FarmState;

pub type UInt = u32;

/// Lowest and highest market price (inclusive) drawn each day.
pub const MIN_MARKET_PRICE: UInt = 1;
pub const MAX_MARKET_PRICE: UInt = 10;
