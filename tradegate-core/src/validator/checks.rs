//! The individual confirmation checks.
//!
//! Each check is a total function from series data to a [`CheckResult`]:
//! malformed input becomes a failed (or skipped) result with a detail line,
//! never a panic or an error return, so one bad check cannot take down the
//! rest of the suite.

use super::{CheckOutcome, CheckResult};
use crate::domain::{MarketSeries, OrderSide};
use crate::indicators::{macd_series, Ema, Indicator, Rsi, RollingVwap, VolumeSma};
use chrono::{DateTime, Utc};

/// Bars older than this are flagged stale (soft warning).
const MAX_BAR_AGE_MINUTES: f64 = 20.0;

/// Close-to-close move beyond this percentage is flagged as a spike.
const SPIKE_THRESHOLD_PCT: f64 = 3.0;

/// Minimum body/range ratio for a conviction candle.
const MIN_BODY_RATIO: f64 = 0.60;

/// Body/range ratio below this is a doji.
const DOJI_BODY_RATIO: f64 = 0.10;

/// Current volume must reach this multiple of the 20-bar mean.
const VOLUME_RATIO_THRESHOLD: f64 = 1.2;

fn last_value(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| !v.is_nan())
}

/// 1. Price confirmation: the latest bar must carry a positive close inside
/// a structurally consistent OHLC envelope. Staleness and outsized
/// close-to-close moves are soft warnings, not failures.
pub fn price_confirmation(
    series: &MarketSeries,
    now: DateTime<Utc>,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> CheckResult {
    let mut result = CheckResult::empty();

    let Some(latest) = series.latest() else {
        result.details.push("no bars available".to_string());
        errors.push("invalid price data".to_string());
        return result;
    };

    let close = latest.close;
    if close.is_nan() || close <= 0.0 {
        result.details.push("price is NaN or zero".to_string());
        errors.push("invalid price data".to_string());
        return result;
    }
    result.values.insert("price".to_string(), close);
    result.details.push(format!("valid price: ${close:.2}"));

    let age_minutes = (now - latest.timestamp).num_seconds() as f64 / 60.0;
    if age_minutes > MAX_BAR_AGE_MINUTES {
        result.details.push(format!(
            "data age: {age_minutes:.1} minutes (threshold: {MAX_BAR_AGE_MINUTES:.0}m)"
        ));
        warnings.push(format!("price data is {age_minutes:.1} min old"));
    } else {
        result
            .details
            .push(format!("data fresh: {age_minutes:.1} min old"));
    }

    if let Some(prev) = series.prev() {
        if prev.close > 0.0 {
            let change_pct = (close - prev.close).abs() / prev.close * 100.0;
            if change_pct > SPIKE_THRESHOLD_PCT {
                result.details.push(format!(
                    "abnormal spike: {change_pct:.2}% (threshold: {SPIKE_THRESHOLD_PCT:.0}%)"
                ));
                warnings.push(format!("price moved {change_pct:.2}% since last candle"));
            } else {
                result
                    .details
                    .push(format!("price move normal: {change_pct:.2}%"));
            }
        }
    }

    if latest.high < close || latest.low > close {
        result.details.push("invalid OHLC structure".to_string());
        errors.push("OHLC data integrity check failed".to_string());
        return result;
    }

    result.outcome = CheckOutcome::Pass;
    result.scored = true;
    result
}

/// 2. Trend confirmation on the 15-minute series: EMA 20/50/200 stacking or
/// position relative to the rolling VWAP, direction-dependent. Fewer than
/// 200 bars degrades the EMA200 reading gracefully; EMA20/EMA50 and VWAP
/// are still evaluated.
pub fn trend_confirmation(
    series: &MarketSeries,
    direction: OrderSide,
    warnings: &mut Vec<String>,
) -> CheckResult {
    let mut result = CheckResult::empty();
    let bars = &series.bars;

    let Some(latest) = series.latest() else {
        result.details.push("no bars available".to_string());
        return result;
    };
    let close = latest.close;

    if bars.len() < 200 {
        result.details.push(format!(
            "insufficient data: {} candles (need 200 for ema200)",
            bars.len()
        ));
        warnings.push("insufficient candles for full trend analysis".to_string());
    }

    let ema_20 = last_value(&Ema::new(20).compute(bars));
    let ema_50 = last_value(&Ema::new(50).compute(bars));
    let ema_200 = last_value(&Ema::new(200).compute(bars));
    let vwap = last_value(&RollingVwap::new(20).compute(bars));

    for (name, value) in [
        ("ema_20", ema_20),
        ("ema_50", ema_50),
        ("ema_200", ema_200),
        ("vwap", vwap),
    ] {
        if let Some(v) = value {
            result.values.insert(name.to_string(), v);
        }
    }

    let mut ema_structure_ok = false;
    let mut vwap_ok = false;

    match direction {
        OrderSide::Buy => {
            if let (Some(e20), Some(e50)) = (ema_20, ema_50) {
                if close > e20 && e20 > e50 {
                    ema_structure_ok = true;
                    result
                        .details
                        .push("ema structure: close > ema20 > ema50".to_string());
                    match ema_200 {
                        Some(e200) if e50 > e200 => result
                            .details
                            .push("strong trend: ema50 > ema200".to_string()),
                        _ => result
                            .details
                            .push("weak long-term trend: ema50 not above ema200".to_string()),
                    }
                } else {
                    result.details.push(format!(
                        "ema fail: close {close:.2} vs ema20 {e20:.2} vs ema50 {e50:.2}"
                    ));
                }
            }
            if let Some(v) = vwap {
                if close > v {
                    vwap_ok = true;
                    result
                        .details
                        .push(format!("price above vwap: {close:.2} > {v:.2}"));
                } else {
                    result
                        .details
                        .push(format!("price below vwap: {close:.2} < {v:.2}"));
                }
            }
        }
        OrderSide::Sell => {
            if let (Some(e20), Some(e50)) = (ema_20, ema_50) {
                if close < e20 && e20 < e50 {
                    ema_structure_ok = true;
                    result
                        .details
                        .push("ema structure: close < ema20 < ema50".to_string());
                } else {
                    result.details.push(format!(
                        "ema fail: close {close:.2} vs ema20 {e20:.2} vs ema50 {e50:.2}"
                    ));
                }
            }
            if let Some(v) = vwap {
                if close < v {
                    vwap_ok = true;
                    result
                        .details
                        .push(format!("price below vwap: {close:.2} < {v:.2}"));
                } else {
                    result
                        .details
                        .push(format!("price above vwap: {close:.2} > {v:.2}"));
                }
            }
        }
    }

    if ema_structure_ok || vwap_ok {
        result.outcome = CheckOutcome::Pass;
        result.scored = true;
    }
    result
}

/// 3. Momentum confirmation: RSI(14) band plus MACD(12,26,9) agreement.
/// The point requires both sub-checks to pass independently; an overheated
/// RSI (>75 for buys, <25 for sells) is a hard fail of its sub-check.
pub fn momentum_confirmation(series: &MarketSeries, direction: OrderSide) -> CheckResult {
    let mut result = CheckResult::empty();
    let bars = &series.bars;

    let rsi = last_value(&Rsi::new(14).compute(bars));
    let macd = macd_series(bars, 12, 26, 9);
    let (line, signal, histogram) = macd.latest();

    if let Some(r) = rsi {
        result.values.insert("rsi".to_string(), r);
    }
    for (name, value) in [
        ("macd", line),
        ("macd_signal", signal),
        ("macd_histogram", histogram),
    ] {
        if !value.is_nan() {
            result.values.insert(name.to_string(), value);
        }
    }

    let mut rsi_ok = false;
    let mut macd_ok = false;

    match direction {
        OrderSide::Buy => {
            match rsi {
                None => result.details.push("rsi not calculated".to_string()),
                Some(r) if r > 75.0 => result
                    .details
                    .push(format!("overbought: rsi {r:.2} > 75")),
                Some(r) if (55.0..=70.0).contains(&r) => {
                    rsi_ok = true;
                    result.details.push(format!("bullish rsi: {r:.2} (55-70)"));
                }
                Some(r) if r >= 50.0 => result
                    .details
                    .push(format!("neutral rsi: {r:.2} (not ideal for buy)")),
                Some(r) => result.details.push(format!("weak rsi: {r:.2} (< 50)")),
            }

            if line.is_nan() || signal.is_nan() {
                result.details.push("macd not calculated".to_string());
            } else if line > signal && histogram > 0.0 {
                macd_ok = true;
                result.details.push(format!(
                    "macd bullish: {line:.4} above signal {signal:.4}"
                ));
            } else if line > signal {
                result
                    .details
                    .push("macd above signal but histogram declining".to_string());
            } else {
                result
                    .details
                    .push("macd below signal: not bullish".to_string());
            }
        }
        OrderSide::Sell => {
            match rsi {
                None => result.details.push("rsi not calculated".to_string()),
                Some(r) if r < 25.0 => result
                    .details
                    .push(format!("oversold: rsi {r:.2} < 25")),
                Some(r) if (30.0..=45.0).contains(&r) => {
                    rsi_ok = true;
                    result.details.push(format!("bearish rsi: {r:.2} (30-45)"));
                }
                Some(r) if r <= 50.0 => result.details.push(format!("neutral rsi: {r:.2}")),
                Some(r) => result.details.push(format!("strong rsi: {r:.2} (> 50)")),
            }

            if line.is_nan() || signal.is_nan() {
                result.details.push("macd not calculated".to_string());
            } else if line < signal && histogram < 0.0 {
                macd_ok = true;
                result.details.push(format!(
                    "macd bearish: {line:.4} below signal {signal:.4}"
                ));
            } else if line < signal {
                result
                    .details
                    .push("macd below signal but histogram rising".to_string());
            } else {
                result
                    .details
                    .push("macd above signal: not bearish".to_string());
            }
        }
    }

    if rsi_ok && macd_ok {
        result.outcome = CheckOutcome::Pass;
        result.scored = true;
    }
    result
}

/// 4. Candle strength on the latest bar: body at least 60% of range,
/// not a doji, not a both-sided long-wick indecision candle.
pub fn candle_strength(series: &MarketSeries) -> CheckResult {
    let mut result = CheckResult::empty();

    let Some(latest) = series.latest() else {
        result.details.push("no bars available".to_string());
        return result;
    };

    let range = latest.range();
    let body = latest.body();
    if range.is_finite() {
        result.values.insert("range".to_string(), range);
    }
    if body.is_finite() {
        result.values.insert("body_size".to_string(), body);
    }

    if !(range > 0.0) {
        result.details.push("invalid candle range".to_string());
        return result;
    }

    let body_ratio = body / range;
    result.values.insert("body_ratio".to_string(), body_ratio);

    let mut passed = if body_ratio >= MIN_BODY_RATIO {
        result.details.push(format!(
            "strong body: {:.1}% of range (threshold: 60%)",
            body_ratio * 100.0
        ));
        true
    } else {
        result.details.push(format!(
            "weak body: {:.1}% of range (need: 60%)",
            body_ratio * 100.0
        ));
        false
    };

    if body_ratio < DOJI_BODY_RATIO {
        result
            .details
            .push("doji-like candle (indecision)".to_string());
        passed = false;
    }

    if latest.upper_wick() > body && latest.lower_wick() > body {
        result
            .details
            .push("indecision candle (long wicks both sides)".to_string());
        passed = false;
    }

    if passed {
        result.outcome = CheckOutcome::Pass;
        result.scored = true;
    }
    result
}

/// 5. Volume confirmation: current volume at or above 1.2x the 20-bar mean.
///
/// Deliberately asymmetric with checks 1-4: missing volume history is a
/// graceful skip, and low volume is a non-failing, non-scoring soft pass.
pub fn volume_confirmation(series: &MarketSeries) -> CheckResult {
    let mut result = CheckResult::empty();
    let bars = &series.bars;

    if bars.len() < 20 {
        result
            .details
            .push(format!("insufficient volume data: {} candles", bars.len()));
        result.outcome = CheckOutcome::Skipped;
        return result;
    }

    let current = series.latest().map(|b| b.volume).unwrap_or(f64::NAN);
    let mean = last_value(&VolumeSma::new(20).compute(bars));

    if current.is_finite() {
        result.values.insert("current_volume".to_string(), current);
    }

    let Some(mean) = mean.filter(|m| *m > 0.0) else {
        result
            .details
            .push("volume sma20 not available".to_string());
        result.outcome = CheckOutcome::Skipped;
        return result;
    };
    result.values.insert("volume_sma20".to_string(), mean);

    let ratio = current / mean;
    if ratio.is_finite() {
        result.values.insert("ratio".to_string(), ratio);
    }

    if ratio >= VOLUME_RATIO_THRESHOLD {
        result.details.push(format!(
            "volume elevated: {ratio:.2}x average (threshold: {VOLUME_RATIO_THRESHOLD}x)"
        ));
        result.outcome = CheckOutcome::Pass;
        result.scored = true;
    } else {
        result.details.push(format!(
            "low volume: {ratio:.2}x average (need: {VOLUME_RATIO_THRESHOLD}x)"
        ));
        // Soft pass: counts toward the tally but earns no point.
        result.outcome = CheckOutcome::Pass;
    }
    result
}

/// 6. Multi-timeframe alignment: the hourly EMA50 slope classifies the
/// higher timeframe as bullish or bearish, and the 15m signal must agree.
/// Insufficient hourly history is a graceful skip.
pub fn multitf_alignment(hourly: &MarketSeries, direction: OrderSide) -> CheckResult {
    let mut result = CheckResult::empty();
    let bars = &hourly.bars;

    if bars.len() < 50 {
        result
            .details
            .push(format!("insufficient 1h data: {} candles", bars.len()));
        result.outcome = CheckOutcome::Skipped;
        return result;
    }

    let ema = Ema::new(50).compute(bars);
    let current = ema[bars.len() - 1];
    let previous = ema[bars.len() - 2];

    if current.is_nan() {
        result
            .details
            .push("1h ema50 not calculated".to_string());
        result.outcome = CheckOutcome::Skipped;
        return result;
    }
    result.values.insert("hour_ema_50".to_string(), current);

    if previous.is_nan() {
        result
            .details
            .push("cannot determine 1h trend".to_string());
        result.outcome = CheckOutcome::Skipped;
        return result;
    }

    let bullish = current > previous;
    let aligned = match direction {
        OrderSide::Buy => bullish,
        OrderSide::Sell => !bullish,
    };
    let trend = if bullish { "bullish" } else { "bearish" };

    if aligned {
        result.details.push(format!(
            "aligned: 15m {} with 1h {trend}",
            direction.as_str().to_ascii_lowercase()
        ));
        result.outcome = CheckOutcome::Pass;
        result.scored = true;
    } else {
        result.details.push(format!(
            "conflict: 15m {} against 1h {trend}",
            direction.as_str().to_ascii_lowercase()
        ));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, Interval};
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 14, 30, 0).unwrap()
    }

    fn series_from_closes(closes: &[f64], interval: Interval) -> MarketSeries {
        let step = match interval {
            Interval::M15 => Duration::minutes(15),
            Interval::H1 => Duration::hours(1),
        };
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    timestamp: base_time() + step * i as i32,
                    open,
                    high: open.max(close) + 0.1,
                    low: open.min(close) - 0.1,
                    close,
                    volume: 1000.0,
                }
            })
            .collect();
        MarketSeries::new("TEST", interval, bars)
    }

    /// `now` landing right on the latest bar keeps the freshness sub-check
    /// quiet in tests that don't care about it.
    fn now_for(series: &MarketSeries) -> DateTime<Utc> {
        series.latest().unwrap().timestamp + Duration::minutes(5)
    }

    // ── price confirmation ───────────────────────────────────────────────

    #[test]
    fn price_check_passes_clean_bar() {
        let series = series_from_closes(&[100.0, 100.5, 101.0], Interval::M15);
        let mut errors = vec![];
        let mut warnings = vec![];
        let result = price_confirmation(&series, now_for(&series), &mut errors, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(result.scored);
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
        assert_eq!(result.values["price"], 101.0);
    }

    #[test]
    fn price_check_hard_fails_on_nan_close() {
        let mut series = series_from_closes(&[100.0, 101.0], Interval::M15);
        series.bars.last_mut().unwrap().close = f64::NAN;
        let mut errors = vec![];
        let mut warnings = vec![];
        let result = price_confirmation(&series, now_for(&series), &mut errors, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert_eq!(errors, vec!["invalid price data"]);
    }

    #[test]
    fn price_check_hard_fails_on_broken_ohlc() {
        let mut series = series_from_closes(&[100.0, 101.0], Interval::M15);
        series.bars.last_mut().unwrap().high = 100.0; // below close
        let mut errors = vec![];
        let mut warnings = vec![];
        let result = price_confirmation(&series, now_for(&series), &mut errors, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert!(errors.iter().any(|e| e.contains("OHLC")));
    }

    #[test]
    fn price_check_stale_bar_is_soft_warning() {
        let series = series_from_closes(&[100.0, 101.0], Interval::M15);
        let stale_now = series.latest().unwrap().timestamp + Duration::minutes(45);
        let mut errors = vec![];
        let mut warnings = vec![];
        let result = price_confirmation(&series, stale_now, &mut errors, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(result.scored);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("min old"));
    }

    #[test]
    fn price_check_spike_is_soft_warning() {
        let series = series_from_closes(&[100.0, 108.0], Interval::M15);
        let mut errors = vec![];
        let mut warnings = vec![];
        let result = price_confirmation(&series, now_for(&series), &mut errors, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(warnings.iter().any(|w| w.contains("since last candle")));
    }

    // ── trend confirmation ───────────────────────────────────────────────

    fn uptrend_closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn trend_buy_passes_in_uptrend() {
        let series = series_from_closes(&uptrend_closes(60), Interval::M15);
        let mut warnings = vec![];
        let result = trend_confirmation(&series, OrderSide::Buy, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(result.scored);
        // 60 bars < 200: degraded EMA200 is a warning, not a failure.
        assert_eq!(warnings.len(), 1);
        assert!(result.values.contains_key("ema_20"));
        assert!(!result.values.contains_key("ema_200"));
    }

    #[test]
    fn trend_buy_fails_in_downtrend() {
        let closes: Vec<f64> = (0..60).map(|i| 130.0 - i as f64 * 0.5).collect();
        let series = series_from_closes(&closes, Interval::M15);
        let mut warnings = vec![];
        let result = trend_confirmation(&series, OrderSide::Buy, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert!(!result.scored);
    }

    #[test]
    fn trend_sell_passes_in_downtrend() {
        let closes: Vec<f64> = (0..60).map(|i| 130.0 - i as f64 * 0.5).collect();
        let series = series_from_closes(&closes, Interval::M15);
        let mut warnings = vec![];
        let result = trend_confirmation(&series, OrderSide::Sell, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Pass);
    }

    #[test]
    fn trend_reports_ema200_when_enough_bars() {
        let series = series_from_closes(&uptrend_closes(220), Interval::M15);
        let mut warnings = vec![];
        let result = trend_confirmation(&series, OrderSide::Buy, &mut warnings);
        assert!(warnings.is_empty());
        assert!(result.values.contains_key("ema_200"));
        assert!(result
            .details
            .iter()
            .any(|d| d.contains("strong trend: ema50 > ema200")));
    }

    #[test]
    fn trend_vwap_alone_can_pass() {
        // Too few bars for EMA50 (need 50), enough for VWAP (20): a rising
        // close above the rolling VWAP still earns the point.
        let series = series_from_closes(&uptrend_closes(30), Interval::M15);
        let mut warnings = vec![];
        let result = trend_confirmation(&series, OrderSide::Buy, &mut warnings);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(result.values.contains_key("vwap"));
        assert!(!result.values.contains_key("ema_50"));
    }

    // ── momentum confirmation ────────────────────────────────────────────

    /// Rising sawtooth with gains outweighing losses and slowly growing
    /// steps: RSI settles in the low 60s and the accelerating trend keeps
    /// the MACD histogram positive. An odd step count ends the series on a
    /// gain bar, which the momentum fixtures rely on.
    fn bullish_momentum_closes(steps: usize) -> Vec<f64> {
        let mut closes = vec![100.0];
        for i in 0..steps {
            let prev = *closes.last().unwrap();
            let scale = 1.0 + 0.003 * i as f64;
            let step = if i % 2 == 0 {
                0.55 * scale
            } else {
                -0.35 * scale
            };
            closes.push(prev + step);
        }
        closes
    }

    #[test]
    fn momentum_buy_passes_with_healthy_rsi_and_macd() {
        let closes = bullish_momentum_closes(101);
        let series = series_from_closes(&closes, Interval::M15);
        let result = momentum_confirmation(&series, OrderSide::Buy);
        assert_eq!(
            result.outcome,
            CheckOutcome::Pass,
            "details: {:?}",
            result.details
        );
        let rsi = result.values["rsi"];
        assert!((55.0..=70.0).contains(&rsi), "rsi = {rsi}");
        assert!(result.values["macd_histogram"] > 0.0);
    }

    #[test]
    fn momentum_buy_hard_fails_overbought() {
        // Monotone rise: RSI saturates at 100, far over the 75 cap.
        let series = series_from_closes(&uptrend_closes(60), Interval::M15);
        let result = momentum_confirmation(&series, OrderSide::Buy);
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert!(result.details.iter().any(|d| d.contains("overbought")));
    }

    #[test]
    fn momentum_fails_without_enough_bars() {
        let series = series_from_closes(&[100.0, 101.0, 102.0], Interval::M15);
        let result = momentum_confirmation(&series, OrderSide::Buy);
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert!(result.details.iter().any(|d| d.contains("not calculated")));
    }

    #[test]
    fn momentum_sell_fails_in_bullish_tape() {
        let closes = bullish_momentum_closes(101);
        let series = series_from_closes(&closes, Interval::M15);
        let result = momentum_confirmation(&series, OrderSide::Sell);
        assert_eq!(result.outcome, CheckOutcome::Fail);
    }

    // ── candle strength ──────────────────────────────────────────────────

    fn candle(open: f64, high: f64, low: f64, close: f64) -> MarketSeries {
        let bar = Bar {
            timestamp: base_time(),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        };
        MarketSeries::new("TEST", Interval::M15, vec![bar])
    }

    #[test]
    fn candle_strong_body_passes() {
        // body 2.0, range 2.4 → 83%.
        let result = candle_strength(&candle(100.0, 102.2, 99.8, 102.0));
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(result.scored);
    }

    #[test]
    fn candle_weak_body_fails() {
        // body 0.4, range 2.0 → 20%.
        let result = candle_strength(&candle(100.0, 101.5, 99.5, 100.4));
        assert_eq!(result.outcome, CheckOutcome::Fail);
    }

    #[test]
    fn candle_doji_fails() {
        // body 0.05, range 2.0 → 2.5%: doji.
        let result = candle_strength(&candle(100.0, 101.0, 99.0, 100.05));
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert!(result.details.iter().any(|d| d.contains("doji")));
    }

    #[test]
    fn candle_zero_range_hard_fails() {
        let result = candle_strength(&candle(100.0, 100.0, 100.0, 100.0));
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert!(result
            .details
            .iter()
            .any(|d| d.contains("invalid candle range")));
    }

    // ── volume confirmation ──────────────────────────────────────────────

    #[test]
    fn volume_elevated_passes_and_scores() {
        let mut series = series_from_closes(&uptrend_closes(30), Interval::M15);
        series.bars.last_mut().unwrap().volume = 2000.0;
        let result = volume_confirmation(&series);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(result.scored);
        assert!(result.values["ratio"] > 1.2);
    }

    #[test]
    fn volume_low_is_soft_pass_without_point() {
        let series = series_from_closes(&uptrend_closes(30), Interval::M15);
        let result = volume_confirmation(&series);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(!result.scored);
    }

    #[test]
    fn volume_short_history_is_skip() {
        let series = series_from_closes(&uptrend_closes(10), Interval::M15);
        let result = volume_confirmation(&series);
        assert_eq!(result.outcome, CheckOutcome::Skipped);
        assert!(!result.scored);
    }

    #[test]
    fn volume_zero_mean_is_skip() {
        let mut series = series_from_closes(&uptrend_closes(30), Interval::M15);
        for bar in &mut series.bars {
            bar.volume = 0.0;
        }
        let result = volume_confirmation(&series);
        assert_eq!(result.outcome, CheckOutcome::Skipped);
    }

    // ── multi-timeframe alignment ────────────────────────────────────────

    #[test]
    fn multitf_buy_aligns_with_rising_hourly() {
        let series = series_from_closes(&uptrend_closes(80), Interval::H1);
        let result = multitf_alignment(&series, OrderSide::Buy);
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert!(result.scored);
    }

    #[test]
    fn multitf_buy_conflicts_with_falling_hourly() {
        let closes: Vec<f64> = (0..80).map(|i| 150.0 - i as f64 * 0.5).collect();
        let series = series_from_closes(&closes, Interval::H1);
        let result = multitf_alignment(&series, OrderSide::Buy);
        assert_eq!(result.outcome, CheckOutcome::Fail);
        assert!(result.details.iter().any(|d| d.contains("conflict")));
    }

    #[test]
    fn multitf_sell_aligns_with_falling_hourly() {
        let closes: Vec<f64> = (0..80).map(|i| 150.0 - i as f64 * 0.5).collect();
        let series = series_from_closes(&closes, Interval::H1);
        let result = multitf_alignment(&series, OrderSide::Sell);
        assert_eq!(result.outcome, CheckOutcome::Pass);
    }

    #[test]
    fn multitf_short_history_is_skip() {
        let series = series_from_closes(&uptrend_closes(30), Interval::H1);
        let result = multitf_alignment(&series, OrderSide::Buy);
        assert_eq!(result.outcome, CheckOutcome::Skipped);
    }

    #[test]
    fn multitf_seed_bar_cannot_classify_trend() {
        // Exactly 50 bars: EMA50 exists only at the last index, so there is
        // no previous value to compare against.
        let series = series_from_closes(&uptrend_closes(50), Interval::H1);
        let result = multitf_alignment(&series, OrderSide::Buy);
        assert_eq!(result.outcome, CheckOutcome::Skipped);
        assert!(result
            .details
            .iter()
            .any(|d| d.contains("cannot determine 1h trend")));
    }
}
