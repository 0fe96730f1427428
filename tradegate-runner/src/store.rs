//! In-memory append-only ledger store with JSON snapshot persistence.
//!
//! The store is the single source of truth the decision pipeline reads and
//! writes. All access goes through `&mut self`, which is the serialization
//! point the core engines rely on: every admission decision sees a
//! consistent snapshot. Trade rows are append-only — nothing updates or
//! deletes an individual row, and the only destructive operation is the
//! explicit [`LedgerStore::reset_all`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tradegate_core::domain::{
    OpenOrder, OrderId, OrderSide, TradeId, TradeRecord, TradeStatus,
};
use tracing::info;

/// Errors from store persistence and open-order bookkeeping.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encode/decode error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("open order not found: {0}")]
    OrderNotFound(OrderId),
}

/// Everything needed to append a ledger row; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTrade {
    pub symbol: String,
    pub side: OrderSide,
    pub qty: u32,
    pub price: f64,
    pub executed_price: Option<f64>,
    pub status: TradeStatus,
    pub timestamp: DateTime<Utc>,
    pub validation: Option<serde_json::Value>,
}

/// Append-only trade ledger plus the pending-order registry.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LedgerStore {
    trades: Vec<TradeRecord>,
    open_orders: Vec<OpenOrder>,
    next_trade_id: u64,
    next_order_id: u64,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trade row and return its assigned id.
    pub fn append_trade(&mut self, new: NewTrade) -> TradeId {
        self.next_trade_id += 1;
        let id = TradeId(self.next_trade_id);
        self.trades.push(TradeRecord {
            id,
            symbol: new.symbol,
            side: new.side,
            qty: new.qty,
            price: new.price,
            executed_price: new.executed_price,
            status: new.status,
            timestamp: new.timestamp,
            validation: new.validation,
        });
        id
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn open_orders(&self) -> &[OpenOrder] {
        &self.open_orders
    }

    /// Register an order as in flight so the duplicate-pending admission
    /// check can see it.
    pub fn register_open_order(
        &mut self,
        symbol: &str,
        side: OrderSide,
        qty: u32,
        price: f64,
        now: DateTime<Utc>,
    ) -> OrderId {
        self.next_order_id += 1;
        let id = OrderId(self.next_order_id);
        self.open_orders.push(OpenOrder {
            id,
            symbol: symbol.to_string(),
            side,
            qty,
            price,
            broker_order_id: None,
            created_at: now,
            filled_at: None,
        });
        id
    }

    /// Mark an in-flight order terminal (filled or abandoned).
    pub fn resolve_open_order(
        &mut self,
        id: OrderId,
        at: DateTime<Utc>,
        broker_order_id: Option<String>,
    ) -> Result<(), StoreError> {
        let order = self
            .open_orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::OrderNotFound(id))?;
        order.filled_at = Some(at);
        if broker_order_id.is_some() {
            order.broker_order_id = broker_order_id;
        }
        Ok(())
    }

    /// Destructive bulk reset: clears every trade and open order.
    ///
    /// Irreversible. Id counters keep counting so ids from before the reset
    /// are never reused.
    pub fn reset_all(&mut self) {
        info!(
            trades = self.trades.len(),
            open_orders = self.open_orders.len(),
            "resetting ledger store"
        );
        self.trades.clear();
        self.open_orders.clear();
    }

    /// Write a JSON snapshot of the full store state.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a snapshot previously written by [`LedgerStore::save`].
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
