//! RiskSettings — the limit configuration in force at validation time.
//!
//! Read fresh for every decision and passed into the core engines as an
//! immutable value. There is no ambient global: the caller owns where the
//! snapshot comes from (TOML file, operator edit, test literal).

use serde::{Deserialize, Serialize};

/// Configurable trading limits.
///
/// `max_orders_per_minute` and `min_buying_power_required` ride along in the
/// snapshot for the brokerage-side collaborator; the admission pipeline
/// itself does not evaluate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    /// Max quantity per single order.
    pub max_qty_per_order: u32,
    /// Max notional value per order.
    pub max_notional_per_order: f64,
    /// Max orders allowed per minute.
    pub max_orders_per_minute: u32,
    /// Max realized loss allowed per day before trading stops.
    pub max_daily_loss: f64,
    /// Max number of filled trades per day.
    pub max_trades_per_day: u32,
    /// Max total notional exposure across all positions.
    pub max_total_position_notional: f64,
    /// Max absolute position for a single symbol.
    pub max_position_per_symbol: u32,
    /// If true, only admit orders during RTH (9:30-16:00 ET weekdays).
    pub only_trade_during_rth: bool,
    /// If false, reject incoming alerts at the subscription gate.
    pub subscribe_to_strategy: bool,
    /// If true, confirm signals against market data before admission.
    pub enable_signal_validation: bool,
    /// Minimum buying power required to place a BUY order.
    pub min_buying_power_required: f64,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            max_qty_per_order: 100,
            max_notional_per_order: 50_000.0,
            max_orders_per_minute: 5,
            max_daily_loss: 2_000.0,
            max_trades_per_day: 50,
            max_total_position_notional: 250_000.0,
            max_position_per_symbol: 1_000,
            only_trade_during_rth: false,
            subscribe_to_strategy: true,
            enable_signal_validation: true,
            min_buying_power_required: 1_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_limits() {
        let s = RiskSettings::default();
        assert_eq!(s.max_qty_per_order, 100);
        assert_eq!(s.max_notional_per_order, 50_000.0);
        assert_eq!(s.max_daily_loss, 2_000.0);
        assert_eq!(s.max_trades_per_day, 50);
        assert_eq!(s.max_position_per_symbol, 1_000);
        assert_eq!(s.max_total_position_notional, 250_000.0);
        assert!(!s.only_trade_during_rth);
        assert!(s.subscribe_to_strategy);
        assert!(s.enable_signal_validation);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let s: RiskSettings = toml::from_str("max_qty_per_order = 25\n").unwrap();
        assert_eq!(s.max_qty_per_order, 25);
        assert_eq!(s.max_trades_per_day, 50);
    }
}
