//! End-to-end decision pipeline tests.
//!
//! Each gate gets a scenario: schema refusal, signal rejection (via a dead
//! data provider), the subscription switch, risk admission, execution
//! success, and gateway failure. Signal validation is switched off where a
//! test only cares about downstream gates.

use chrono::{DateTime, TimeZone, Utc};
use tradegate_core::data::{DataError, MarketDataProvider};
use tradegate_core::domain::{Interval, MarketSeries, OrderSide, RiskSettings, TradeStatus};
use tradegate_core::ledger::LedgerView;
use tradegate_core::pnl::positions_and_pnl;
use tradegate_runner::{Decision, DecisionPipeline, LedgerStore, PaperGateway, SignalAlert};

/// Provider for tests that never reach (or intentionally fail) validation.
struct DeadProvider;

impl MarketDataProvider for DeadProvider {
    fn name(&self) -> &str {
        "dead"
    }

    fn fetch(
        &self,
        _symbol: &str,
        _interval: Interval,
        _lookback_days: u32,
    ) -> Result<MarketSeries, DataError> {
        Err(DataError::NetworkUnreachable("offline".into()))
    }
}

fn now() -> DateTime<Utc> {
    // Tuesday, mid-session ET.
    Utc.with_ymd_and_hms(2026, 3, 3, 15, 0, 0).unwrap()
}

fn alert(symbol: &str, side: &str, qty: u32, price: f64) -> SignalAlert {
    SignalAlert {
        symbol: symbol.into(),
        side: side.into(),
        qty,
        price,
    }
}

fn settings_without_validation() -> RiskSettings {
    RiskSettings {
        enable_signal_validation: false,
        ..RiskSettings::default()
    }
}

fn marked_gateway(symbol: &str, price: f64) -> PaperGateway {
    let mut gateway = PaperGateway::default();
    gateway.set_mark(symbol, price);
    gateway
}

#[test]
fn malformed_alert_leaves_no_ledger_record() {
    let provider = DeadProvider;
    let mut gateway = PaperGateway::default();
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = settings_without_validation();

    let zero_qty = pipeline.handle_alert(&mut store, &alert("AAPL", "BUY", 0, 100.0), &settings, now());
    assert!(matches!(zero_qty, Decision::SchemaRejected { .. }));

    let bad_side = pipeline.handle_alert(&mut store, &alert("AAPL", "HOLD", 5, 100.0), &settings, now());
    assert!(matches!(bad_side, Decision::SchemaRejected { .. }));

    assert!(store.trades().is_empty());
}

#[test]
fn failed_validation_records_signal_rejection() {
    let provider = DeadProvider;
    let mut gateway = marked_gateway("AAPL", 100.0);
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = RiskSettings::default(); // validation enabled

    let decision =
        pipeline.handle_alert(&mut store, &alert("aapl", "BUY", 5, 100.0), &settings, now());

    let Decision::SignalRejected { trade_id, reason } = decision else {
        panic!("expected SignalRejected, got {decision:?}");
    };
    assert!(reason.contains("failed to fetch 15m data for AAPL"));

    let trade = &store.trades()[0];
    assert_eq!(trade.id, trade_id);
    assert_eq!(trade.symbol, "AAPL");
    assert!(matches!(trade.status, TradeStatus::SignalRejected { .. }));
    // The full report rides along as the validation payload.
    let payload = trade.validation.as_ref().unwrap();
    assert_eq!(payload["valid"], false);
}

#[test]
fn subscription_switch_blocks_confirmed_signals() {
    let provider = DeadProvider;
    let mut gateway = marked_gateway("AAPL", 100.0);
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = RiskSettings {
        subscribe_to_strategy: false,
        ..settings_without_validation()
    };

    let decision =
        pipeline.handle_alert(&mut store, &alert("AAPL", "BUY", 5, 100.0), &settings, now());
    assert!(matches!(decision, Decision::SubscriptionRejected { .. }));

    let trade = &store.trades()[0];
    assert_eq!(
        trade.status,
        TradeStatus::RiskRejected {
            reason: "subscription_disabled".into()
        }
    );
}

#[test]
fn risk_violation_records_reason_verbatim() {
    let provider = DeadProvider;
    let mut gateway = marked_gateway("AAPL", 100.0);
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = settings_without_validation();

    let qty = settings.max_qty_per_order + 1;
    let decision =
        pipeline.handle_alert(&mut store, &alert("AAPL", "BUY", qty, 10.0), &settings, now());

    let Decision::RiskRejected { reason, .. } = decision else {
        panic!("expected RiskRejected");
    };
    assert!(reason.contains("qty_exceeds_max"));
    assert!(matches!(
        store.trades()[0].status,
        TradeStatus::RiskRejected { .. }
    ));
}

#[test]
fn executed_alert_fills_and_feeds_accounting() {
    let provider = DeadProvider;
    let mut gateway = marked_gateway("AAPL", 101.5);
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = settings_without_validation();

    let decision =
        pipeline.handle_alert(&mut store, &alert("AAPL", "BUY", 10, 100.0), &settings, now());

    let Decision::Executed {
        trade_id,
        executed_price,
    } = decision
    else {
        panic!("expected Executed, got {decision:?}");
    };
    assert_eq!(executed_price, 101.5);

    let trade = &store.trades()[0];
    assert_eq!(trade.id, trade_id);
    assert_eq!(trade.executed_price, Some(101.5));
    assert!(trade.status.is_filled());

    // The in-flight marker was resolved at fill time.
    assert!(!store.open_orders()[0].is_pending());

    // Filled rows flow straight into the accounting engine.
    let ledger = LedgerView::from_records(store.trades());
    assert_eq!(positions_and_pnl(&ledger)["AAPL"].position, 10);
}

#[test]
fn in_flight_order_blocks_duplicate_alert() {
    let provider = DeadProvider;
    let mut gateway = marked_gateway("AAPL", 100.0);
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = settings_without_validation();

    // Simulate another worker's decision still in flight.
    store.register_open_order("AAPL", OrderSide::Buy, 5, 100.0, now());

    let decision =
        pipeline.handle_alert(&mut store, &alert("AAPL", "BUY", 5, 100.0), &settings, now());

    let Decision::RiskRejected { reason, .. } = decision else {
        panic!("expected RiskRejected");
    };
    assert_eq!(reason, "pending_buy_order_exists_for_AAPL");
}

#[test]
fn gateway_failure_records_error_status() {
    let provider = DeadProvider;
    let mut gateway = PaperGateway::default(); // no marks: every order fails
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = settings_without_validation();

    let decision =
        pipeline.handle_alert(&mut store, &alert("AAPL", "BUY", 5, 100.0), &settings, now());

    let Decision::ExecutionFailed { detail, .. } = decision else {
        panic!("expected ExecutionFailed, got {decision:?}");
    };
    assert!(detail.contains("no market for symbol"));

    let trade = &store.trades()[0];
    assert!(matches!(trade.status, TradeStatus::Error { .. }));
    assert_eq!(trade.executed_price, None);
    // The in-flight marker does not linger after a failure.
    assert!(!store.open_orders()[0].is_pending());
}

#[test]
fn sell_flow_round_trip_realizes_pnl() {
    let provider = DeadProvider;
    let mut gateway = marked_gateway("AAPL", 100.0);
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let mut store = LedgerStore::new();
    let settings = settings_without_validation();

    let buy = pipeline.handle_alert(&mut store, &alert("AAPL", "BUY", 10, 100.0), &settings, now());
    assert!(matches!(buy, Decision::Executed { .. }));

    let sell =
        pipeline.handle_alert(&mut store, &alert("AAPL", "SELL", 10, 110.0), &settings, now());
    assert!(matches!(sell, Decision::Executed { .. }));

    // Contract A prices at the requested (alert) prices, so the realized
    // figure follows the signal prices even though both paper fills
    // happened at the same mark.
    let ledger = LedgerView::from_records(store.trades());
    let aapl = &positions_and_pnl(&ledger)["AAPL"];
    assert_eq!(aapl.position, 0);
    assert_eq!(aapl.realized, 100.0); // (110-100)*10
}
