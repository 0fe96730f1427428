//! Data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over OHLCV sources so the signal
//! validator can be driven by a live feed in production and a canned series
//! in tests. Transport, caching, and retry policy all live behind the trait;
//! the validator consumes the returned series as an abstract value and is
//! expected to fail fast on empty or malformed data.

use crate::domain::{Interval, MarketSeries};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no data returned for {symbol} at {interval}")]
    EmptySeries { symbol: String, interval: Interval },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for market data providers.
///
/// Implementations fetch `lookback_days` of history for a symbol at the
/// requested interval, oldest bar first. They must not block indefinitely;
/// bounding latency with a timeout is the implementation's job, since the
/// validator has no internal timeout of its own.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch OHLCV bars for a symbol over a trailing window.
    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        lookback_days: u32,
    ) -> Result<MarketSeries, DataError>;
}
