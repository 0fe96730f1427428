//! Rolling mean volume.
//!
//! Simple moving average of bar volume over `period` bars; the volume
//! confirmation check compares the current bar against this baseline.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume SMA period must be >= 1");
        Self {
            period,
            name: format!("vol_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
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

        // Running-sum sliding window; volumes are non-negative so no
        // cancellation concerns.
        let mut sum: f64 = bars.iter().take(self.period).map(|b| b.volume).sum();
        result[self.period - 1] = sum / self.period as f64;
        for i in self.period..n {
            sum += bars[i].volume - bars[i - self.period].volume;
            result[i] = sum / self.period as f64;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn volume_sma_of_constant_volume() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = VolumeSma::new(3).compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 1000.0, 1e-9);
        assert_approx(result[3], 1000.0, 1e-9);
    }

    #[test]
    fn volume_sma_tracks_window() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0]);
        bars[0].volume = 100.0;
        bars[1].volume = 200.0;
        bars[2].volume = 300.0;
        bars[3].volume = 400.0;
        let result = VolumeSma::new(2).compute(&bars);
        assert_approx(result[1], 150.0, 1e-9);
        assert_approx(result[2], 250.0, 1e-9);
        assert_approx(result[3], 350.0, 1e-9);
    }

    #[test]
    fn volume_sma_short_series_is_all_nan() {
        let bars = make_bars(&[10.0]);
        let result = VolumeSma::new(20).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
