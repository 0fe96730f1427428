//! Incoming signal alerts and their schema gate.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradegate_core::domain::OrderSide;

/// A raw trade signal as delivered by the upstream alerting system.
///
/// Fields arrive untrusted: the side is free text and the quantity may be
/// zero. [`SignalAlert::validate`] is the schema gate the pipeline applies
/// before anything touches the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalAlert {
    pub symbol: String,
    pub side: String,
    pub qty: u32,
    pub price: f64,
}

/// Schema-level rejection of an alert. These never produce a ledger record;
/// the alert is refused at the front door.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    #[error("invalid qty: must be positive")]
    InvalidQty,

    #[error("unknown side: {0}")]
    UnknownSide(String),
}

impl SignalAlert {
    /// Uppercase-normalized symbol, the form every ledger record uses.
    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }

    /// Schema gate: positive quantity and a recognizable side.
    pub fn validate(&self) -> Result<OrderSide, AlertError> {
        if self.qty == 0 {
            return Err(AlertError::InvalidQty);
        }
        OrderSide::parse(&self.side).ok_or_else(|| AlertError::UnknownSide(self.side.clone()))
    }
}
