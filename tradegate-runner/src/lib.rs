//! Tradegate Runner — order decision orchestration.
//!
//! Wires the core engines into the layered decision pipeline the gateway
//! runs per alert: schema gate → signal confirmation → subscription gate →
//! risk admission → execution → ledger append. Owns the in-memory ledger
//! store (the single serialization point for reads and writes) and the
//! execution gateway boundary.

pub mod alert;
pub mod config;
pub mod execution;
pub mod pipeline;
pub mod store;

pub use alert::{AlertError, SignalAlert};
pub use config::{ConfigError, GatewayConfig};
pub use execution::{ExecutionError, ExecutionGateway, FillReport, PaperGateway};
pub use pipeline::{Decision, DecisionPipeline};
pub use store::{LedgerStore, NewTrade, StoreError};
