//! Trade ledger records — the append-only history every engine reads.

use super::ids::TradeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an order or trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Uppercase wire form ("BUY" / "SELL").
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }

    /// Parse a side from alert input, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Some(OrderSide::Buy),
            "SELL" => Some(OrderSide::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a decision-pipeline invocation, carried on the trade record.
///
/// Every rejection carries its reason as structured data; `is_filled()` is
/// the only predicate the accounting engines ever need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TradeStatus {
    /// Created but not yet resolved by execution.
    Pending,
    /// Executed; `detail` preserves the gateway's fill report text.
    Filled { detail: Option<String> },
    /// Cancelled before execution.
    Cancelled,
    /// Rejected by the admission pipeline with a machine-parsable reason.
    RiskRejected { reason: String },
    /// Rejected by the signal confirmation engine.
    SignalRejected { reason: String },
    /// Execution attempted but failed.
    Error { detail: String },
}

impl TradeStatus {
    /// Only filled trades participate in position and PnL computation.
    pub fn is_filled(&self) -> bool {
        matches!(self, TradeStatus::Filled { .. })
    }
}

/// One row of the append-only trade ledger.
///
/// Immutable once created except for the fields set at fill time
/// (`executed_price`, the `Filled` status detail). `price` is the
/// signal-time (requested) price; `executed_price` is the actual fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: TradeId,
    pub symbol: String,
    pub side: OrderSide,
    pub qty: u32,
    pub price: f64,
    pub executed_price: Option<f64>,
    pub status: TradeStatus,
    pub timestamp: DateTime<Utc>,
    /// Opaque diagnostic blob from signal validation, if any.
    pub validation: Option<serde_json::Value>,
}

impl TradeRecord {
    /// Executed price when present, else the requested price.
    pub fn fill_price(&self) -> f64 {
        self.executed_price.unwrap_or(self.price)
    }

    /// Requested notional value of the trade.
    pub fn notional(&self) -> f64 {
        f64::from(self.qty) * self.price
    }
}
