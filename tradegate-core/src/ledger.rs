//! LedgerView — the read model every engine computes from.
//!
//! A view borrows the caller's trade records, keeps only filled rows, and
//! orders them by (timestamp, id). The risk checks re-derive position,
//! daily counts, and exposure from the view on every call rather than
//! caching running totals; at the order rates this system sees, recomputing
//! from a consistent snapshot beats reconciling incremental state.

use crate::domain::{OrderSide, Symbol, TradeRecord};
use chrono::NaiveDate;

/// Filled trades, ordered by time, borrowed from a caller-owned snapshot.
#[derive(Debug, Clone)]
pub struct LedgerView<'a> {
    trades: Vec<&'a TradeRecord>,
}

impl<'a> LedgerView<'a> {
    /// Build a view over the filled subset of `records`, ordered by
    /// (timestamp, id). The id tiebreak keeps replay deterministic when two
    /// fills share a timestamp.
    pub fn from_records(records: &'a [TradeRecord]) -> Self {
        let mut trades: Vec<&TradeRecord> =
            records.iter().filter(|t| t.status.is_filled()).collect();
        trades.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Self { trades }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TradeRecord> + '_ {
        self.trades.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Net filled position for a symbol: sum of buy quantities minus sum of
    /// sell quantities.
    pub fn net_position(&self, symbol: &str) -> i64 {
        self.trades
            .iter()
            .filter(|t| t.symbol == symbol)
            .map(|t| match t.side {
                OrderSide::Buy => i64::from(t.qty),
                OrderSide::Sell => -i64::from(t.qty),
            })
            .sum()
    }

    /// Number of filled trades whose UTC calendar date equals `day`.
    pub fn filled_count_on(&self, day: NaiveDate) -> usize {
        self.trades
            .iter()
            .filter(|t| t.timestamp.date_naive() == day)
            .count()
    }

    /// Gross filled exposure: sum of |qty * requested price| across every
    /// filled trade, long and short alike.
    pub fn total_exposure(&self) -> f64 {
        self.trades.iter().map(|t| t.notional().abs()).sum()
    }

    /// Symbols that appear in the view, in first-seen order.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut seen = Vec::new();
        for t in &self.trades {
            if !seen.iter().any(|s: &Symbol| s == &t.symbol) {
                seen.push(t.symbol.clone());
            }
        }
        seen
    }
}
