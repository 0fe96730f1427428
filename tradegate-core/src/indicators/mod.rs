//! Indicator implementations used by the signal confirmation engine.
//!
//! Indicators are pure functions: bar history in, numeric series out. Each
//! output series has the same length as the input, with `f64::NAN` for the
//! warmup prefix. No indicator value at bar t may depend on data from bar
//! t+1 or later.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volume;
pub mod vwap;

pub use ema::{ema_of_series, Ema};
pub use macd::{macd_series, MacdSeries};
pub use rsi::Rsi;
pub use volume::VolumeSma;
pub use vwap::RollingVwap;

use crate::domain::Bar;

/// Trait for single-series indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`; the first
    /// `lookback()` values are `f64::NAN`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic 15-minute bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for the first
/// bar), high/low bracket the body by 0.5, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + Duration::minutes(15 * i as i64),
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
