//! OpenOrder — pending-order rows for duplicate suppression.

use super::ids::OrderId;
use super::trade::OrderSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A submitted order that has not yet been confirmed filled or cancelled.
///
/// The admission pipeline scans these rows to suppress duplicate alerts for
/// the same symbol+side inside a short window. This is a best-effort
/// heuristic, not an order state machine: `filled_at` is set once when the
/// gateway reports a terminal outcome, and stale pending rows simply age out
/// of the scan window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrder {
    pub id: OrderId,
    pub symbol: String,
    pub side: OrderSide,
    pub qty: u32,
    pub price: f64,
    /// Gateway-assigned order id, when the gateway reports one.
    pub broker_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// When the order reached a terminal state (filled or cancelled).
    pub filled_at: Option<DateTime<Utc>>,
}

impl OpenOrder {
    pub fn is_pending(&self) -> bool {
        self.filled_at.is_none()
    }
}
