//! Tradegate CLI — operator entry points for the order gateway.
//!
//! Commands:
//! - `validate` — score a directional signal against CSV bar files
//! - `pnl` — compute per-symbol PnL from a CSV ledger export
//! - `check-order` — dry-run the admission gate for a candidate order
//! - `run-alert` — push one alert through the full decision pipeline
//!   against a JSON ledger snapshot and the paper gateway

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tradegate_core::data::{DataError, MarketDataProvider};
use tradegate_core::domain::{
    Bar, Interval, MarketSeries, OrderSide, TradeId, TradeRecord, TradeStatus,
};
use tradegate_core::ledger::LedgerView;
use tradegate_core::pnl::{daily_realized, positions_and_pnl};
use tradegate_core::risk::RiskManager;
use tradegate_core::validator::SignalValidator;
use tradegate_runner::{
    DecisionPipeline, GatewayConfig, LedgerStore, PaperGateway, SignalAlert,
};

#[derive(Parser)]
#[command(
    name = "tradegate",
    about = "Tradegate CLI — signal validation, PnL accounting, order admission"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a BUY/SELL signal against bar files and print the report.
    Validate {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Signal direction: BUY or SELL.
        direction: String,

        /// CSV of 15-minute bars (timestamp,open,high,low,close,volume).
        #[arg(long)]
        bars: PathBuf,

        /// Optional CSV of hourly bars for the multi-timeframe check.
        #[arg(long)]
        hourly: Option<PathBuf>,
    },
    /// Compute per-symbol positions and PnL from a ledger export.
    Pnl {
        /// CSV ledger (id,symbol,side,qty,price,executed_price,status,timestamp).
        #[arg(long)]
        ledger: PathBuf,

        /// Also report realized PnL for this UTC date (YYYY-MM-DD).
        #[arg(long)]
        daily: Option<String>,
    },
    /// Dry-run the admission gate for a candidate order.
    CheckOrder {
        /// Ticker symbol.
        symbol: String,

        /// Order side: BUY or SELL.
        side: String,

        /// Order quantity.
        qty: u32,

        /// Order price.
        price: f64,

        /// CSV ledger supplying current positions and exposure.
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// TOML gateway config; defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run one alert through every gate and append the outcome.
    RunAlert {
        /// Alert as inline JSON: {"symbol":..,"side":..,"qty":..,"price":..}.
        #[arg(long)]
        alert: String,

        /// JSON ledger snapshot; loaded if present, saved back afterwards.
        #[arg(long)]
        store: PathBuf,

        /// TOML gateway config supplying risk limits and paper marks.
        #[arg(long)]
        config: Option<PathBuf>,

        /// CSV of 15-minute bars backing signal validation.
        #[arg(long)]
        bars: Option<PathBuf>,

        /// Optional CSV of hourly bars for the multi-timeframe check.
        #[arg(long)]
        hourly: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate {
            symbol,
            direction,
            bars,
            hourly,
        } => cmd_validate(&symbol, &direction, &bars, hourly.as_deref()),
        Commands::Pnl { ledger, daily } => cmd_pnl(&ledger, daily.as_deref()),
        Commands::CheckOrder {
            symbol,
            side,
            qty,
            price,
            ledger,
            config,
        } => cmd_check_order(&symbol, &side, qty, price, ledger.as_deref(), config.as_deref()),
        Commands::RunAlert {
            alert,
            store,
            config,
            bars,
            hourly,
        } => cmd_run_alert(
            &alert,
            &store,
            config.as_deref(),
            bars.as_deref(),
            hourly.as_deref(),
        ),
    }
}

// ── validate ─────────────────────────────────────────────────────────

/// Serves CSV-backed series through the provider trait the validator uses.
struct FileProvider {
    m15: MarketSeries,
    h1: Option<MarketSeries>,
}

impl MarketDataProvider for FileProvider {
    fn name(&self) -> &str {
        "csv-files"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        _lookback_days: u32,
    ) -> Result<MarketSeries, DataError> {
        match interval {
            Interval::M15 => Ok(self.m15.clone()),
            Interval::H1 => self.h1.clone().ok_or(DataError::EmptySeries {
                symbol: symbol.to_string(),
                interval,
            }),
        }
    }
}

fn cmd_validate(symbol: &str, direction: &str, bars: &Path, hourly: Option<&Path>) -> Result<()> {
    let Some(direction) = OrderSide::parse(direction) else {
        bail!("direction must be BUY or SELL, got '{direction}'");
    };

    let m15 = MarketSeries::new(symbol.to_uppercase(), Interval::M15, load_bars(bars)?);
    let h1 = hourly
        .map(|path| -> Result<MarketSeries> {
            Ok(MarketSeries::new(
                symbol.to_uppercase(),
                Interval::H1,
                load_bars(path)?,
            ))
        })
        .transpose()?;

    let provider = FileProvider { m15, h1 };
    let report = SignalValidator::new(&provider).validate(symbol, direction, Utc::now());

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Debug, Deserialize)]
struct BarRow {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

fn load_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open bar file {}", path.display()))?;
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let row: BarRow = row.with_context(|| format!("bad bar row in {}", path.display()))?;
        bars.push(Bar {
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}

// ── pnl ──────────────────────────────────────────────────────────────

fn cmd_pnl(ledger_path: &Path, daily: Option<&str>) -> Result<()> {
    let records = load_ledger(ledger_path)?;
    let ledger = LedgerView::from_records(&records);

    let by_symbol = positions_and_pnl(&ledger);
    println!("{}", serde_json::to_string_pretty(&by_symbol)?);

    if let Some(day) = daily {
        let day: NaiveDate = day
            .parse()
            .with_context(|| format!("bad --daily date '{day}', expected YYYY-MM-DD"))?;
        println!("daily_realized[{day}]: {}", daily_realized(&ledger, day));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    id: u64,
    symbol: String,
    side: String,
    qty: u32,
    price: f64,
    executed_price: Option<f64>,
    status: String,
    timestamp: DateTime<Utc>,
}

fn load_ledger(path: &Path) -> Result<Vec<TradeRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open ledger file {}", path.display()))?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: LedgerRow = row.with_context(|| format!("bad ledger row in {}", path.display()))?;
        let side = OrderSide::parse(&row.side)
            .with_context(|| format!("unknown side '{}' for trade {}", row.side, row.id))?;
        records.push(TradeRecord {
            id: TradeId(row.id),
            symbol: row.symbol.to_uppercase(),
            side,
            qty: row.qty,
            price: row.price,
            executed_price: row.executed_price,
            status: parse_status(&row.status)
                .with_context(|| format!("unknown status '{}' for trade {}", row.status, row.id))?,
            timestamp: row.timestamp,
            validation: None,
        });
    }
    Ok(records)
}

fn parse_status(s: &str) -> Option<TradeStatus> {
    match s.to_ascii_lowercase().as_str() {
        "filled" => Some(TradeStatus::Filled { detail: None }),
        "pending" => Some(TradeStatus::Pending),
        "cancelled" => Some(TradeStatus::Cancelled),
        "risk_rejected" => Some(TradeStatus::RiskRejected {
            reason: String::new(),
        }),
        "signal_rejected" => Some(TradeStatus::SignalRejected {
            reason: String::new(),
        }),
        "error" => Some(TradeStatus::Error {
            detail: String::new(),
        }),
        _ => None,
    }
}

// ── check-order ──────────────────────────────────────────────────────

fn cmd_check_order(
    symbol: &str,
    side: &str,
    qty: u32,
    price: f64,
    ledger_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<()> {
    let Some(side) = OrderSide::parse(side) else {
        bail!("side must be BUY or SELL, got '{side}'");
    };

    let config = match config_path {
        Some(path) => GatewayConfig::from_path(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => GatewayConfig::default(),
    };

    let records = match ledger_path {
        Some(path) => load_ledger(path)?,
        None => Vec::new(),
    };
    let ledger = LedgerView::from_records(&records);

    let symbol = symbol.to_uppercase();
    match RiskManager::new().validate_order(
        &symbol,
        side,
        qty,
        price,
        &ledger,
        &[],
        &config.risk,
        Utc::now(),
    ) {
        Ok(()) => println!("APPROVED: {side} {qty} {symbol} @ {price}"),
        Err(violation) => println!("REJECTED: {violation}"),
    }
    Ok(())
}

// ── run-alert ────────────────────────────────────────────────────────

fn cmd_run_alert(
    alert_json: &str,
    store_path: &Path,
    config_path: Option<&Path>,
    bars: Option<&Path>,
    hourly: Option<&Path>,
) -> Result<()> {
    let alert: SignalAlert =
        serde_json::from_str(alert_json).context("alert must be JSON with symbol/side/qty/price")?;

    let config = match config_path {
        Some(path) => GatewayConfig::from_path(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => GatewayConfig::default(),
    };

    let mut store = if store_path.exists() {
        LedgerStore::load(store_path)
            .with_context(|| format!("cannot load ledger snapshot {}", store_path.display()))?
    } else {
        LedgerStore::new()
    };

    // Without bar files the provider serves an empty series and validation
    // (if enabled in the config) rejects the signal as unconfirmable.
    let symbol = alert.normalized_symbol();
    let m15 = match bars {
        Some(path) => MarketSeries::new(symbol.clone(), Interval::M15, load_bars(path)?),
        None => MarketSeries::new(symbol.clone(), Interval::M15, Vec::new()),
    };
    let h1 = hourly
        .map(|path| -> Result<MarketSeries> {
            Ok(MarketSeries::new(symbol.clone(), Interval::H1, load_bars(path)?))
        })
        .transpose()?;
    let provider = FileProvider { m15, h1 };

    let mut gateway = PaperGateway::new(config.paper_marks.clone());
    let mut pipeline = DecisionPipeline::new(&provider, &mut gateway);
    let decision = pipeline.handle_alert(&mut store, &alert, &config.risk, Utc::now());

    store
        .save(store_path)
        .with_context(|| format!("cannot save ledger snapshot {}", store_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
