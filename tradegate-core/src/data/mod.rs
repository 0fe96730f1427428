//! Market data access boundary.

pub mod provider;

pub use provider::{DataError, MarketDataProvider};
