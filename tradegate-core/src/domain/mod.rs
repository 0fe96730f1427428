//! Domain types for Tradegate.

pub mod bar;
pub mod ids;
pub mod order;
pub mod series;
pub mod settings;
pub mod trade;

pub use bar::Bar;
pub use ids::{OrderId, TradeId};
pub use order::OpenOrder;
pub use series::{Interval, MarketSeries};
pub use settings::RiskSettings;
pub use trade::{OrderSide, TradeRecord, TradeStatus};

/// Symbol type alias
pub type Symbol = String;
