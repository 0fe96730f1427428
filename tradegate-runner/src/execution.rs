//! Execution gateway boundary.
//!
//! The trait stands in for the subprocess that talks to a live brokerage
//! endpoint. The pipeline only ever sees a fill report or a structured
//! error; brokerage protocol details stay on the far side of the trait.

use std::collections::HashMap;
use thiserror::Error;
use tradegate_core::domain::OrderSide;
use tracing::info;

/// Errors surfaced by an execution gateway.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    #[error("no market for symbol: {0}")]
    UnknownSymbol(String),

    #[error("order rejected by broker: {0}")]
    BrokerRejected(String),
}

/// A successful execution: price, broker reference, and the gateway's own
/// description of what happened (kept verbatim on the trade record).
#[derive(Debug, Clone)]
pub struct FillReport {
    pub executed_price: f64,
    pub broker_order_id: Option<String>,
    pub detail: String,
}

/// Boundary to the order execution venue.
pub trait ExecutionGateway {
    /// Human-readable name of the venue ("paper", "ibkr", ...).
    fn name(&self) -> &str;

    /// Submit a market order and block until a terminal outcome.
    fn place_order(
        &mut self,
        symbol: &str,
        side: OrderSide,
        qty: u32,
    ) -> Result<FillReport, ExecutionError>;
}

/// Paper gateway: fills instantly at a configured per-symbol mark.
///
/// Symbols without a mark are refused — silently inventing a price would
/// corrupt every downstream PnL figure.
#[derive(Debug, Default)]
pub struct PaperGateway {
    marks: HashMap<String, f64>,
    sequence: u64,
}

impl PaperGateway {
    pub fn new(marks: HashMap<String, f64>) -> Self {
        let marks = marks
            .into_iter()
            .map(|(symbol, price)| (symbol.to_uppercase(), price))
            .collect();
        Self { marks, sequence: 0 }
    }

    /// Set or update the mark price used for fills of `symbol`.
    pub fn set_mark(&mut self, symbol: &str, price: f64) {
        self.marks.insert(symbol.to_uppercase(), price);
    }
}

impl ExecutionGateway for PaperGateway {
    fn name(&self) -> &str {
        "paper"
    }

    fn place_order(
        &mut self,
        symbol: &str,
        side: OrderSide,
        qty: u32,
    ) -> Result<FillReport, ExecutionError> {
        let price = self
            .marks
            .get(symbol)
            .copied()
            .ok_or_else(|| ExecutionError::UnknownSymbol(symbol.to_string()))?;

        self.sequence += 1;
        let report = FillReport {
            executed_price: price,
            broker_order_id: Some(format!("paper-{}", self.sequence)),
            detail: format!("paper fill {qty}@{price:.2}"),
        };
        info!(symbol, side = %side, qty, price, "paper order filled");
        Ok(report)
    }
}
