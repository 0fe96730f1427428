//! Rolling volume-weighted average price.
//!
//! vwap[t] = Σ(typical * volume) / Σ(volume) over the trailing `period`
//! bars, with typical = (high + low + close) / 3. A session-anchored VWAP
//! needs exchange session boundaries the series does not carry, so the
//! trend check uses this rolling approximation instead.
//! Lookback: period - 1. Windows with NaN bars or zero total volume are NaN.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RollingVwap {
    period: usize,
    name: String,
}

impl RollingVwap {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "VWAP period must be >= 1");
        Self {
            period,
            name: format!("vwap_{period}"),
        }
    }
}

impl Indicator for RollingVwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];

            let mut weighted = 0.0;
            let mut total_volume = 0.0;
            let mut has_nan = false;
            for bar in window {
                if bar.is_void() || bar.volume.is_nan() {
                    has_nan = true;
                    break;
                }
                weighted += bar.typical_price() * bar.volume;
                total_volume += bar.volume;
            }

            if !has_nan && total_volume > 0.0 {
                result[i] = weighted / total_volume;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn vwap_equal_volume_is_mean_typical_price() {
        // make_bars assigns equal volume, so VWAP reduces to the mean of
        // typical prices over the window.
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = RollingVwap::new(2).compute(&bars);

        assert!(result[0].is_nan());
        let expected = (bars[2].typical_price() + bars[3].typical_price()) / 2.0;
        assert_approx(result[3], expected, 1e-9);
    }

    #[test]
    fn vwap_weights_by_volume() {
        let mut bars = make_bars(&[10.0, 20.0]);
        bars[0].volume = 3000.0;
        bars[1].volume = 1000.0;
        let result = RollingVwap::new(2).compute(&bars);

        let expected = (bars[0].typical_price() * 3000.0 + bars[1].typical_price() * 1000.0)
            / 4000.0;
        assert_approx(result[1], expected, 1e-9);
    }

    #[test]
    fn vwap_zero_volume_window_is_nan() {
        let mut bars = make_bars(&[10.0, 11.0]);
        bars[0].volume = 0.0;
        bars[1].volume = 0.0;
        let result = RollingVwap::new(2).compute(&bars);
        assert!(result[1].is_nan());
    }

    #[test]
    fn vwap_short_series_is_all_nan() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = RollingVwap::new(20).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn vwap_lookback() {
        assert_eq!(RollingVwap::new(20).lookback(), 19);
    }
}
