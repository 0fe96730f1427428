//! Tradegate Core — signal confirmation, order admission, FIFO accounting.
//!
//! The three engines at the heart of the order gateway:
//! - Signal validator: scores a directional signal against independent
//!   market data (price, trend, momentum, candle, volume, multi-timeframe)
//! - Risk manager: sequential admission gate over configurable limits and
//!   current ledger state
//! - PnL engine: FIFO position/PnL reconstruction from the filled ledger
//!
//! All three are pure, synchronous computations over immutable snapshots
//! passed in by the caller. They perform no I/O of their own (market data
//! arrives through the `MarketDataProvider` trait) and can be called from
//! any number of threads as long as each call gets its own snapshot.

pub mod data;
pub mod domain;
pub mod indicators;
pub mod ledger;
pub mod pnl;
pub mod risk;
pub mod validator;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the orchestration layer moves across
    /// threads is Send + Sync. If any type loses the property, the build
    /// breaks here instead of in a worker-thread retrofit later.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::MarketSeries>();
        require_sync::<domain::MarketSeries>();
        require_send::<domain::Interval>();
        require_sync::<domain::Interval>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::TradeStatus>();
        require_sync::<domain::TradeStatus>();
        require_send::<domain::OpenOrder>();
        require_sync::<domain::OpenOrder>();
        require_send::<domain::RiskSettings>();
        require_sync::<domain::RiskSettings>();
        require_send::<domain::TradeId>();
        require_sync::<domain::TradeId>();
        require_send::<domain::OrderId>();
        require_sync::<domain::OrderId>();

        // Engine types
        require_send::<pnl::SymbolPnl>();
        require_sync::<pnl::SymbolPnl>();
        require_send::<pnl::TradePnl>();
        require_sync::<pnl::TradePnl>();
        require_send::<risk::RiskManager>();
        require_sync::<risk::RiskManager>();
        require_send::<risk::RiskViolation>();
        require_sync::<risk::RiskViolation>();
        require_send::<validator::ValidationReport>();
        require_sync::<validator::ValidationReport>();
        require_send::<validator::CheckResult>();
        require_sync::<validator::CheckResult>();

        // Data boundary
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
    }
}
