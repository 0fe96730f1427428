//! Moving Average Convergence Divergence (MACD).
//!
//! line      = EMA(close, fast) - EMA(close, slow)
//! signal    = EMA(line, signal_period), seeded on the first valid line value
//! histogram = line - signal
//!
//! All three series are produced in one pass because the momentum check
//! needs them together; callers that want a single component index into the
//! returned struct. Lookback: (slow - 1) + (signal_period - 1).

use super::ema::ema_of_series;
use crate::domain::Bar;

/// The three MACD output series, each the same length as the input bars.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    /// Latest (line, signal, histogram) triple, NaN-filled when the series
    /// is too short for the full warmup.
    pub fn latest(&self) -> (f64, f64, f64) {
        let last = |v: &Vec<f64>| v.last().copied().unwrap_or(f64::NAN);
        (last(&self.line), last(&self.signal), last(&self.histogram))
    }
}

/// Compute MACD over a bar series with the given periods.
pub fn macd_series(bars: &[Bar], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let n = bars.len();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let fast_ema = ema_of_series(&closes, fast);
    let slow_ema = ema_of_series(&closes, slow);

    let mut line = vec![f64::NAN; n];
    for i in 0..n {
        if !fast_ema[i].is_nan() && !slow_ema[i].is_nan() {
            line[i] = fast_ema[i] - slow_ema[i];
        }
    }

    // The line carries a NaN warmup prefix, so the signal EMA is computed
    // over the valid suffix and pasted back at the right offset.
    let mut signal = vec![f64::NAN; n];
    if let Some(first_valid) = line.iter().position(|v| !v.is_nan()) {
        let suffix_signal = ema_of_series(&line[first_valid..], signal_period);
        for (offset, value) in suffix_signal.into_iter().enumerate() {
            signal[first_valid + offset] = value;
        }
    }

    let mut histogram = vec![f64::NAN; n];
    for i in 0..n {
        if !line[i].is_nan() && !signal[i].is_nan() {
            histogram[i] = line[i] - signal[i];
        }
    }

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
