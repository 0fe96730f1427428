//! Signal confirmation engine.
//!
//! Scores an incoming directional signal against independent market data
//! before it is allowed anywhere near the admission pipeline. Six checks —
//! price, trend, momentum, candle strength, volume, and multi-timeframe
//! alignment — each contribute at most one point; a signal is approved when
//! at least four checks do not fail.
//!
//! The engine never raises for expected conditions: fetch failures come
//! back as a rejected report with an error entry, and a misbehaving check
//! marks itself failed without aborting the others.

pub mod checks;

use crate::data::MarketDataProvider;
use crate::domain::{Interval, OrderSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Checks that must not fail for approval.
pub const REQUIRED_PASSES: u32 = 4;

/// Number of point-carrying checks in the base score.
pub const MAX_SCORE: u32 = 5;

/// Trailing window fetched for the 15-minute series.
pub const M15_LOOKBACK_DAYS: u32 = 7;

/// Trailing window fetched for the hourly series.
pub const H1_LOOKBACK_DAYS: u32 = 30;

pub const PRICE_CONFIRMATION: &str = "price_confirmation";
pub const TREND_CONFIRMATION: &str = "trend_confirmation";
pub const MOMENTUM_CONFIRMATION: &str = "momentum_confirmation";
pub const CANDLE_STRENGTH: &str = "candle_strength";
pub const VOLUME_CONFIRMATION: &str = "volume_confirmation";
pub const MULTITF_ALIGNMENT: &str = "multitf_alignment";

/// Three-valued outcome of a single check.
///
/// `Skipped` is deliberate: the volume and multi-timeframe checks pass
/// through gracefully when their inputs are missing, and tests need to tell
/// that apart from a genuine pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    Pass,
    Fail,
    Skipped,
}

impl CheckOutcome {
    /// Pass and Skipped both count toward the approval tally.
    pub fn counts_as_passed(&self) -> bool {
        !matches!(self, CheckOutcome::Fail)
    }
}

/// Result of one check: outcome, whether it earned its point, detail lines,
/// and named numeric observations (RSI value, EMA levels, ...).
///
/// `scored` is separate from `outcome` because a check can count as
/// non-failing without earning a point (low volume, skipped inputs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub outcome: CheckOutcome,
    pub scored: bool,
    pub details: Vec<String>,
    pub values: BTreeMap<String, f64>,
}

impl CheckResult {
    fn empty() -> Self {
        Self {
            outcome: CheckOutcome::Fail,
            scored: false,
            details: Vec::new(),
            values: BTreeMap::new(),
        }
    }
}

/// Final verdict of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

/// Full diagnostic record of one signal validation.
///
/// Serialized by the caller as the trade's validation payload, so field
/// names are wire-stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub symbol: String,
    pub direction: OrderSide,
    pub valid: bool,
    pub score: u32,
    pub max_score: u32,
    pub checks: BTreeMap<String, CheckResult>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub checks_passed: u32,
    pub required_passes: u32,
    pub decision: Decision,
    pub reason: String,
}

impl ValidationReport {
    fn new(symbol: &str, direction: OrderSide) -> Self {
        Self {
            symbol: symbol.to_string(),
            direction,
            valid: false,
            score: 0,
            max_score: MAX_SCORE,
            checks: BTreeMap::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            checks_passed: 0,
            required_passes: REQUIRED_PASSES,
            decision: Decision::Rejected,
            reason: String::new(),
        }
    }

    /// Marker report used when validation is disabled in settings: the
    /// pipeline still records *why* no checks ran.
    pub fn skipped(symbol: &str, direction: OrderSide) -> Self {
        let mut report = Self::new(symbol, direction);
        report.valid = true;
        report.decision = Decision::Approved;
        report.reason = "signal validation disabled".to_string();
        report
    }

    fn finalize(&mut self) {
        // The multi-timeframe check is a sixth point source feeding the
        // same five-point cap.
        let points = self.checks.values().filter(|c| c.scored).count() as u32;
        self.score = points.min(self.max_score);
        self.checks_passed = self
            .checks
            .values()
            .filter(|c| c.outcome.counts_as_passed())
            .count() as u32;

        if self.checks_passed >= self.required_passes {
            self.valid = true;
            self.decision = Decision::Approved;
            self.reason = format!(
                "{}/{} checks passed - signal confirmed",
                self.checks_passed, self.max_score
            );
        } else {
            self.valid = false;
            self.decision = Decision::Rejected;
            self.reason = format!(
                "only {}/{} checks passed (need {} minimum) - signal not confirmed",
                self.checks_passed, self.max_score, self.required_passes
            );
        }
    }
}

/// The signal confirmation engine. Borrows a market data provider; holds no
/// other state, so one validator can serve any number of sequential calls.
pub struct SignalValidator<'a> {
    provider: &'a dyn MarketDataProvider,
}

impl<'a> SignalValidator<'a> {
    pub fn new(provider: &'a dyn MarketDataProvider) -> Self {
        Self { provider }
    }

    /// Run the full check suite for `symbol` in `direction`.
    ///
    /// `now` is the decision instant, used by the freshness sub-check.
    /// Always returns a report; data problems surface inside it.
    pub fn validate(
        &self,
        symbol: &str,
        direction: OrderSide,
        now: DateTime<Utc>,
    ) -> ValidationReport {
        let symbol = symbol.to_uppercase();
        let mut report = ValidationReport::new(&symbol, direction);

        let m15 = match self.provider.fetch(&symbol, Interval::M15, M15_LOOKBACK_DAYS) {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => {
                warn!(%symbol, provider = self.provider.name(), "empty 15m series");
                report
                    .errors
                    .push(format!("failed to fetch 15m data for {symbol}"));
                report.reason = format!("failed to fetch 15m data for {symbol}");
                return report;
            }
            Err(err) => {
                warn!(%symbol, provider = self.provider.name(), %err, "15m fetch failed");
                report
                    .errors
                    .push(format!("failed to fetch 15m data for {symbol}"));
                report.reason = format!("failed to fetch 15m data for {symbol}");
                return report;
            }
        };

        // The hourly series is optional: a fetch failure only disables the
        // multi-timeframe check.
        let h1 = match self.provider.fetch(&symbol, Interval::H1, H1_LOOKBACK_DAYS) {
            Ok(series) if !series.is_empty() => Some(series),
            Ok(_) => None,
            Err(err) => {
                warn!(%symbol, provider = self.provider.name(), %err, "1h fetch failed");
                None
            }
        };

        let price = checks::price_confirmation(&m15, now, &mut report.errors, &mut report.warnings);
        report.checks.insert(PRICE_CONFIRMATION.to_string(), price);

        let trend = checks::trend_confirmation(&m15, direction, &mut report.warnings);
        report.checks.insert(TREND_CONFIRMATION.to_string(), trend);

        let momentum = checks::momentum_confirmation(&m15, direction);
        report
            .checks
            .insert(MOMENTUM_CONFIRMATION.to_string(), momentum);

        let candle = checks::candle_strength(&m15);
        report.checks.insert(CANDLE_STRENGTH.to_string(), candle);

        let volume = checks::volume_confirmation(&m15);
        report.checks.insert(VOLUME_CONFIRMATION.to_string(), volume);

        if let Some(h1) = &h1 {
            let multitf = checks::multitf_alignment(h1, direction);
            report.checks.insert(MULTITF_ALIGNMENT.to_string(), multitf);
        }

        report.finalize();
        debug!(
            %symbol,
            direction = %direction,
            checks_passed = report.checks_passed,
            score = report.score,
            decision = ?report.decision,
            "signal validation complete"
        );
        report
    }
}
