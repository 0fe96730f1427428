//! The order decision pipeline.
//!
//! Layered gates, in order: alert schema → signal confirmation →
//! subscription → risk admission → execution → ledger append. Every gate
//! past the schema check leaves a trade record behind, so the ledger tells
//! the full story of rejected flow, not just fills.

use crate::alert::SignalAlert;
use crate::execution::ExecutionGateway;
use crate::store::{LedgerStore, NewTrade};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tradegate_core::data::MarketDataProvider;
use tradegate_core::domain::{RiskSettings, TradeId, TradeStatus};
use tradegate_core::ledger::LedgerView;
use tradegate_core::risk::RiskManager;
use tradegate_core::validator::{SignalValidator, ValidationReport};
use tracing::{info, warn};

/// Terminal outcome of one alert, mirrored into the trade record's status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decision {
    /// All gates passed and the gateway reported a fill.
    Executed {
        trade_id: TradeId,
        executed_price: f64,
    },
    /// Malformed alert; refused at the front door with no ledger record.
    SchemaRejected { reason: String },
    /// Signal confirmation failed.
    SignalRejected { trade_id: TradeId, reason: String },
    /// The operator has the strategy subscription switched off.
    SubscriptionRejected { trade_id: TradeId },
    /// An admission check failed.
    RiskRejected { trade_id: TradeId, reason: String },
    /// Execution was attempted but the gateway errored.
    ExecutionFailed { trade_id: TradeId, detail: String },
}

/// Wires the core engines to a data provider, an execution gateway, and the
/// ledger store. One pipeline instance handles alerts sequentially; the
/// `&mut self` receiver is the caller-side serialization the core's
/// concurrency contract asks for.
pub struct DecisionPipeline<'a> {
    provider: &'a dyn MarketDataProvider,
    gateway: &'a mut dyn ExecutionGateway,
    risk: RiskManager,
}

impl<'a> DecisionPipeline<'a> {
    pub fn new(provider: &'a dyn MarketDataProvider, gateway: &'a mut dyn ExecutionGateway) -> Self {
        Self {
            provider,
            gateway,
            risk: RiskManager::new(),
        }
    }

    /// Run one alert through every gate, appending the outcome to `store`.
    pub fn handle_alert(
        &mut self,
        store: &mut LedgerStore,
        alert: &SignalAlert,
        settings: &RiskSettings,
        now: DateTime<Utc>,
    ) -> Decision {
        // Gate 1: schema. Malformed alerts never reach the ledger.
        let side = match alert.validate() {
            Ok(side) => side,
            Err(err) => {
                warn!(symbol = %alert.symbol, %err, "alert failed schema validation");
                return Decision::SchemaRejected {
                    reason: err.to_string(),
                };
            }
        };
        let symbol = alert.normalized_symbol();

        // Gate 2: signal confirmation against independent market data.
        let report = if settings.enable_signal_validation {
            info!(%symbol, side = %side, "validating signal");
            SignalValidator::new(self.provider).validate(&symbol, side, now)
        } else {
            info!(%symbol, "signal validation disabled - skipping confirmation");
            ValidationReport::skipped(&symbol, side)
        };
        let payload = serde_json::to_value(&report).ok();

        if !report.valid {
            let reason = report.reason.clone();
            let trade_id = store.append_trade(NewTrade {
                symbol: symbol.clone(),
                side,
                qty: alert.qty,
                price: alert.price,
                executed_price: None,
                status: TradeStatus::SignalRejected {
                    reason: reason.clone(),
                },
                timestamp: now,
                validation: payload,
            });
            warn!(%symbol, %reason, "signal not confirmed");
            return Decision::SignalRejected { trade_id, reason };
        }

        // Gate 3: subscription switch.
        if !settings.subscribe_to_strategy {
            let trade_id = store.append_trade(NewTrade {
                symbol: symbol.clone(),
                side,
                qty: alert.qty,
                price: alert.price,
                executed_price: None,
                status: TradeStatus::RiskRejected {
                    reason: "subscription_disabled".to_string(),
                },
                timestamp: now,
                validation: payload,
            });
            return Decision::SubscriptionRejected { trade_id };
        }

        // Gate 4: risk admission over a consistent ledger snapshot.
        let admission = {
            let ledger = LedgerView::from_records(store.trades());
            self.risk.validate_order(
                &symbol,
                side,
                alert.qty,
                alert.price,
                &ledger,
                store.open_orders(),
                settings,
                now,
            )
        };
        if let Err(violation) = admission {
            let reason = violation.to_string();
            let trade_id = store.append_trade(NewTrade {
                symbol: symbol.clone(),
                side,
                qty: alert.qty,
                price: alert.price,
                executed_price: None,
                status: TradeStatus::RiskRejected {
                    reason: reason.clone(),
                },
                timestamp: now,
                validation: payload,
            });
            return Decision::RiskRejected { trade_id, reason };
        }

        // Gate 5: execution. The open-order row makes this decision visible
        // to concurrent duplicate checks while the gateway call is in
        // flight.
        let order_id = store.register_open_order(&symbol, side, alert.qty, alert.price, now);
        let outcome = self.gateway.place_order(&symbol, side, alert.qty);

        match outcome {
            Ok(fill) => {
                if let Err(err) =
                    store.resolve_open_order(order_id, now, fill.broker_order_id.clone())
                {
                    warn!(%err, "failed to resolve open order after fill");
                }
                let trade_id = store.append_trade(NewTrade {
                    symbol: symbol.clone(),
                    side,
                    qty: alert.qty,
                    price: alert.price,
                    executed_price: Some(fill.executed_price),
                    status: TradeStatus::Filled {
                        detail: Some(fill.detail),
                    },
                    timestamp: now,
                    validation: payload,
                });
                info!(%symbol, %trade_id, price = fill.executed_price, "order executed");
                Decision::Executed {
                    trade_id,
                    executed_price: fill.executed_price,
                }
            }
            Err(err) => {
                if let Err(resolve_err) = store.resolve_open_order(order_id, now, None) {
                    warn!(%resolve_err, "failed to resolve open order after error");
                }
                let detail = err.to_string();
                let trade_id = store.append_trade(NewTrade {
                    symbol: symbol.clone(),
                    side,
                    qty: alert.qty,
                    price: alert.price,
                    executed_price: None,
                    status: TradeStatus::Error {
                        detail: detail.clone(),
                    },
                    timestamp: now,
                    validation: payload,
                });
                warn!(%symbol, %detail, "execution failed");
                Decision::ExecutionFailed { trade_id, detail }
            }
        }
    }
}
