//! FIFO position and PnL accounting.
//!
//! Three read-only contracts over a [`LedgerView`]:
//! - [`positions_and_pnl`] — per-symbol position, realized, unrealized,
//!   cumulative, last price.
//! - [`daily_realized`] — net realized PnL for sells matched on a given UTC
//!   calendar date.
//! - [`per_trade_pnl`] — realized/unrealized attribution per trade id.
//!
//! Every contract replays the filled ledger from scratch against transient
//! per-symbol FIFO books; nothing is cached between calls. All monetary
//! outputs are rounded to 6 decimal places.
//!
//! Price sourcing differs by contract: `positions_and_pnl` prices every
//! event at the requested (signal-time) price, while `daily_realized` and
//! `per_trade_pnl` prefer the executed price and fall back to the requested
//! one. Dashboard consumers depend on both behaviors, so the divergence is
//! intentional.

use crate::domain::{OrderSide, Symbol, TradeId};
use crate::ledger::LedgerView;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Unmatched inventory unit inside a FIFO book.
///
/// Positive qty = long lot, negative = short lot. Lots exist only for the
/// duration of a single replay; they are never persisted.
#[derive(Debug, Clone)]
struct Lot {
    qty: i64,
    price: f64,
    trade_id: TradeId,
}

/// Aggregate position and PnL for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolPnl {
    pub symbol: Symbol,
    pub position: i64,
    pub realized: f64,
    pub unrealized: f64,
    pub cumulative: f64,
    pub last_price: Option<f64>,
}

/// PnL attribution for one trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePnl {
    pub realized: f64,
    pub unrealized: f64,
    pub net: f64,
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Per-symbol position, realized, unrealized, and cumulative PnL.
///
/// FIFO replay: a BUY appends a long lot; a SELL consumes long lots from
/// the front, realizing `(sell - lot) * qty` per unit taken, and any
/// unmatched remainder opens a short lot at the front of the book. BUYs
/// never cover shorts in this contract — short inventory stays open and is
/// marked to the last price like any other lot.
///
/// Prices every event at the requested price, including `last_price`.
pub fn positions_and_pnl(ledger: &LedgerView) -> BTreeMap<Symbol, SymbolPnl> {
    let mut books: HashMap<Symbol, VecDeque<Lot>> = HashMap::new();
    let mut last_price: HashMap<Symbol, f64> = HashMap::new();
    let mut realized: HashMap<Symbol, f64> = HashMap::new();

    for t in ledger.iter() {
        let qty = i64::from(t.qty);
        let price = t.price;
        last_price.insert(t.symbol.clone(), price);
        let book = books.entry(t.symbol.clone()).or_default();

        match t.side {
            OrderSide::Buy => book.push_back(Lot {
                qty,
                price,
                trade_id: t.id,
            }),
            OrderSide::Sell => {
                let mut remaining = qty;
                while remaining > 0 {
                    let Some(front) = book.front_mut() else { break };
                    if front.qty <= 0 {
                        break;
                    }
                    let take = front.qty.min(remaining);
                    *realized.entry(t.symbol.clone()).or_default() +=
                        (price - front.price) * take as f64;
                    front.qty -= take;
                    remaining -= take;
                    if front.qty == 0 {
                        book.pop_front();
                    }
                }
                if remaining > 0 {
                    book.push_front(Lot {
                        qty: -remaining,
                        price,
                        trade_id: t.id,
                    });
                }
            }
        }
    }

    let mut results = BTreeMap::new();
    for (symbol, book) in &books {
        let position: i64 = book.iter().map(|l| l.qty).sum();
        let lp = last_price.get(symbol).copied();
        let mut unrealized = 0.0;
        if let Some(lp) = lp {
            // (last - entry) * qty works uniformly: short lots have
            // negative qty, so a price drop below entry yields a gain.
            for lot in book {
                unrealized += (lp - lot.price) * lot.qty as f64;
            }
        }
        let symbol_realized = realized.get(symbol).copied().unwrap_or(0.0);
        results.insert(
            symbol.clone(),
            SymbolPnl {
                symbol: symbol.clone(),
                position,
                realized: round6(symbol_realized),
                unrealized: round6(unrealized),
                cumulative: round6(symbol_realized + unrealized),
                last_price: lp,
            },
        );
    }
    results
}

/// Net realized PnL from SELL-side matches whose trade date (UTC) equals
/// `day`.
///
/// Same FIFO simulation as [`positions_and_pnl`] but priced at the executed
/// price when present. Matches against lots opened on any prior day still
/// count if the sell itself happened on `day`. Short positions opened by an
/// oversell are carried but their later covering is not surfaced here —
/// [`per_trade_pnl`] is the contract that attributes short covers.
pub fn daily_realized(ledger: &LedgerView, day: NaiveDate) -> f64 {
    let mut books: HashMap<Symbol, VecDeque<Lot>> = HashMap::new();
    let mut daily = 0.0;

    for t in ledger.iter() {
        let qty = i64::from(t.qty);
        let price = t.fill_price();
        let book = books.entry(t.symbol.clone()).or_default();

        match t.side {
            OrderSide::Buy => book.push_back(Lot {
                qty,
                price,
                trade_id: t.id,
            }),
            OrderSide::Sell => {
                let mut remaining = qty;
                while remaining > 0 {
                    let Some(front) = book.front_mut() else { break };
                    if front.qty <= 0 {
                        break;
                    }
                    let take = front.qty.min(remaining);
                    let pnl = (price - front.price) * take as f64;
                    if t.timestamp.date_naive() == day {
                        daily += pnl;
                    }
                    front.qty -= take;
                    remaining -= take;
                    if front.qty == 0 {
                        book.pop_front();
                    }
                }
                if remaining > 0 {
                    book.push_front(Lot {
                        qty: -remaining,
                        price,
                        trade_id: t.id,
                    });
                }
            }
        }
    }

    round6(daily)
}

/// Realized and unrealized PnL attributed per trade id.
///
/// Every match event credits its realized delta to the *aggressor* trade —
/// the BUY that covers a short (`(short_entry - cover) * qty`) or the SELL
/// that closes a long (`(sell - entry) * qty`) — never to the resting lot's
/// trade. After the replay, each remaining lot marks its open quantity to
/// the symbol's last price and credits that unrealized amount back to the
/// trade that opened the lot. Trades with no attribution do not appear in
/// the result.
pub fn per_trade_pnl(ledger: &LedgerView) -> BTreeMap<TradeId, TradePnl> {
    let mut books: HashMap<Symbol, VecDeque<Lot>> = HashMap::new();
    let mut last_price: HashMap<Symbol, f64> = HashMap::new();
    let mut acc: HashMap<TradeId, (f64, f64)> = HashMap::new();

    for t in ledger.iter() {
        let qty = i64::from(t.qty);
        let price = t.fill_price();
        last_price.insert(t.symbol.clone(), price);
        let book = books.entry(t.symbol.clone()).or_default();

        match t.side {
            OrderSide::Buy => {
                // Cover short lots first, front of book inward.
                let mut remaining = qty;
                while remaining > 0 {
                    let Some(front) = book.front_mut() else { break };
                    if front.qty >= 0 {
                        break;
                    }
                    let take = remaining.min(-front.qty);
                    acc.entry(t.id).or_default().0 += (front.price - price) * take as f64;
                    front.qty += take;
                    remaining -= take;
                    if front.qty == 0 {
                        book.pop_front();
                    }
                }
                if remaining > 0 {
                    book.push_back(Lot {
                        qty: remaining,
                        price,
                        trade_id: t.id,
                    });
                }
            }
            OrderSide::Sell => {
                // Close long lots first, front of book inward.
                let mut remaining = qty;
                while remaining > 0 {
                    let Some(front) = book.front_mut() else { break };
                    if front.qty <= 0 {
                        break;
                    }
                    let take = remaining.min(front.qty);
                    acc.entry(t.id).or_default().0 += (price - front.price) * take as f64;
                    front.qty -= take;
                    remaining -= take;
                    if front.qty == 0 {
                        book.pop_front();
                    }
                }
                if remaining > 0 {
                    book.push_front(Lot {
                        qty: -remaining,
                        price,
                        trade_id: t.id,
                    });
                }
            }
        }
    }

    // Mark remaining lots to last price, credited to their opening trade.
    for (symbol, book) in &books {
        let Some(&lp) = last_price.get(symbol) else {
            continue;
        };
        for lot in book {
            let unreal = if lot.qty > 0 {
                (lp - lot.price) * lot.qty as f64
            } else {
                (lot.price - lp) * (-lot.qty) as f64
            };
            acc.entry(lot.trade_id).or_default().1 += unreal;
        }
    }

    acc.into_iter()
        .map(|(id, (realized, unrealized))| {
            (
                id,
                TradePnl {
                    realized: round6(realized),
                    unrealized: round6(unrealized),
                    net: round6(realized + unrealized),
                },
            )
        })
        .collect()
}
