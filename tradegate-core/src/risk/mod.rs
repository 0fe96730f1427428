//! Order admission control — the sequential risk gate.
//!
//! `RiskManager::validate_order` evaluates a candidate order against the
//! settings snapshot and the current ledger state, short-circuiting on the
//! first failing check. Every input other than the static limits is
//! re-derived from the ledger on each call: at the order rates this system
//! sees, recomputation from a consistent snapshot is cheaper to get right
//! than incremental counters.

pub mod rth;

pub use rth::is_market_open_rth;

use crate::domain::{OpenOrder, OrderSide, RiskSettings};
use crate::ledger::LedgerView;
use crate::pnl;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;

/// Why an order was refused admission.
///
/// `Display` renders the machine-parsable `reason_code (detail)` string the
/// decision pipeline records and returns verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskViolation {
    #[error("qty_must_be_positive")]
    QtyNotPositive,

    #[error("qty_exceeds_max ({qty} > {max})")]
    QtyExceedsMax { qty: u32, max: u32 },

    #[error("notional_exceeds_max ({notional} > {max})")]
    NotionalExceedsMax { notional: f64, max: f64 },

    #[error("market_not_open_rth_only_trading_enabled")]
    MarketClosed,

    #[error("daily_loss_limit_exceeded (loss: {loss}, limit: -{limit})")]
    DailyLossLimitExceeded { loss: f64, limit: f64 },

    #[error("max_trades_per_day_exceeded ({count} >= {max})")]
    MaxTradesPerDayExceeded { count: usize, max: u32 },

    #[error("pending_{side}_order_exists_for_{symbol}")]
    PendingOrderExists { side: String, symbol: String },

    #[error("insufficient_position_to_sell (have: {have}, want: {want})")]
    InsufficientPosition { have: i64, want: i64 },

    #[error("position_limit_exceeded (would be {projected}, max {max})")]
    PositionLimitExceeded { projected: i64, max: u32 },

    #[error("total_exposure_exceeded (would be {projected} > {max})")]
    TotalExposureExceeded { projected: f64, max: f64 },
}

impl RiskViolation {
    /// Stable reason code, without the parenthesized detail.
    pub fn code(&self) -> &'static str {
        match self {
            RiskViolation::QtyNotPositive => "qty_must_be_positive",
            RiskViolation::QtyExceedsMax { .. } => "qty_exceeds_max",
            RiskViolation::NotionalExceedsMax { .. } => "notional_exceeds_max",
            RiskViolation::MarketClosed => "market_not_open_rth_only_trading_enabled",
            RiskViolation::DailyLossLimitExceeded { .. } => "daily_loss_limit_exceeded",
            RiskViolation::MaxTradesPerDayExceeded { .. } => "max_trades_per_day_exceeded",
            RiskViolation::PendingOrderExists { .. } => "pending_order_exists",
            RiskViolation::InsufficientPosition { .. } => "insufficient_position_to_sell",
            RiskViolation::PositionLimitExceeded { .. } => "position_limit_exceeded",
            RiskViolation::TotalExposureExceeded { .. } => "total_exposure_exceeded",
        }
    }
}

/// How far back the duplicate-pending scan looks.
///
/// A time-windowed heuristic, not a lock: it suppresses double-delivery of
/// the same alert but cannot replace caller-side serialization of decisions
/// for a symbol+side.
const PENDING_ORDER_WINDOW_SECS: i64 = 60;

/// The sequential admission gate.
#[derive(Debug, Default)]
pub struct RiskManager;

impl RiskManager {
    pub fn new() -> Self {
        Self
    }

    /// Admit or reject a candidate order.
    ///
    /// Checks run in a fixed order and stop at the first violation:
    /// quantity and notional caps, RTH session, daily loss, daily trade
    /// count, duplicate pending order, sell inventory, projected position
    /// cap, and total exposure cap. `now` is the decision instant; the RTH,
    /// daily, and pending-window checks are all evaluated against it.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_order(
        &self,
        symbol: &str,
        side: OrderSide,
        qty: u32,
        price: f64,
        ledger: &LedgerView,
        open_orders: &[OpenOrder],
        settings: &RiskSettings,
        now: DateTime<Utc>,
    ) -> Result<(), RiskViolation> {
        let result = self.run_checks(symbol, side, qty, price, ledger, open_orders, settings, now);
        if let Err(violation) = &result {
            debug!(symbol, side = %side, qty, %violation, "order refused admission");
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn run_checks(
        &self,
        symbol: &str,
        side: OrderSide,
        qty: u32,
        price: f64,
        ledger: &LedgerView,
        open_orders: &[OpenOrder],
        settings: &RiskSettings,
        now: DateTime<Utc>,
    ) -> Result<(), RiskViolation> {
        // 1-3: static order-shape limits.
        if qty == 0 {
            return Err(RiskViolation::QtyNotPositive);
        }

        if qty > settings.max_qty_per_order {
            return Err(RiskViolation::QtyExceedsMax {
                qty,
                max: settings.max_qty_per_order,
            });
        }

        let notional = f64::from(qty) * price;
        if notional > settings.max_notional_per_order {
            return Err(RiskViolation::NotionalExceedsMax {
                notional,
                max: settings.max_notional_per_order,
            });
        }

        // 4: session gate.
        if settings.only_trade_during_rth && !is_market_open_rth(now) {
            return Err(RiskViolation::MarketClosed);
        }

        // 5: daily realized loss.
        let today = now.date_naive();
        let daily_pnl = pnl::daily_realized(ledger, today);
        if daily_pnl < -settings.max_daily_loss {
            return Err(RiskViolation::DailyLossLimitExceeded {
                loss: daily_pnl,
                limit: settings.max_daily_loss,
            });
        }

        // 6: daily trade count.
        let todays_trades = ledger.filled_count_on(today);
        if todays_trades >= settings.max_trades_per_day as usize {
            return Err(RiskViolation::MaxTradesPerDayExceeded {
                count: todays_trades,
                max: settings.max_trades_per_day,
            });
        }

        // 7: duplicate pending order inside the trailing window.
        let cutoff = now - Duration::seconds(PENDING_ORDER_WINDOW_SECS);
        let duplicate = open_orders.iter().any(|o| {
            o.symbol == symbol && o.side == side && o.is_pending() && o.created_at > cutoff
        });
        if duplicate {
            return Err(RiskViolation::PendingOrderExists {
                side: side.as_str().to_ascii_lowercase(),
                symbol: symbol.to_string(),
            });
        }

        // 8: sells need inventory.
        let position = ledger.net_position(symbol);
        if side == OrderSide::Sell && position < i64::from(qty) {
            return Err(RiskViolation::InsufficientPosition {
                have: position,
                want: i64::from(qty),
            });
        }

        // 9: projected position cap.
        let projected = match side {
            OrderSide::Buy => position + i64::from(qty),
            OrderSide::Sell => position - i64::from(qty),
        };
        if projected.unsigned_abs() > u64::from(settings.max_position_per_symbol) {
            return Err(RiskViolation::PositionLimitExceeded {
                projected,
                max: settings.max_position_per_symbol,
            });
        }

        // 10: total exposure cap across all symbols.
        let projected_exposure = ledger.total_exposure() + notional.abs();
        if projected_exposure > settings.max_total_position_notional {
            return Err(RiskViolation::TotalExposureExceeded {
                projected: projected_exposure,
                max: settings.max_total_position_notional,
            });
        }

        Ok(())
    }
}
