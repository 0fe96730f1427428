//! MarketSeries — ordered OHLCV bars at a fixed interval.
//!
//! The leaf data contract of the signal validator. A series is supplied by a
//! `MarketDataProvider` implementation and consumed as-is; the validator
//! never refetches or reorders it.

use super::bar::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar interval of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 15-minute bars.
    M15,
    /// Hourly bars.
    H1,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::M15 => write!(f, "15m"),
            Interval::H1 => write!(f, "60m"),
        }
    }
}

/// An ordered sequence of OHLCV bars for one symbol at one interval.
///
/// Bars are expected oldest-first; the latest bar is the last element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSeries {
    pub symbol: String,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

impl MarketSeries {
    pub fn new(symbol: impl Into<String>, interval: Interval, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Latest (most recent) bar, if any.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bar immediately before the latest, if any.
    pub fn prev(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }
}
