//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intraday OHLCV bar for a single symbol at a single interval.
///
/// Volume is a float because providers report fractional share volume for
/// some instruments; the volume checks only ever compare ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Structural OHLC sanity: the close must sit inside [low, high] and the
    /// close must be a positive price.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.close > 0.0 && self.high >= self.close && self.low <= self.close
    }

    /// Absolute candle body: |close - open|.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full candle range: high - low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Wick above the body: high - max(open, close).
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Wick below the body: min(open, close) - low.
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Typical price (high + low + close) / 3, used by the rolling VWAP.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}
