//! Mock screener universe plus the pure filter/sort pass.

use rand::Rng;

use crate::models::{ScreenerFilters, ScreenerResult, Signal, SortField, SortOrder};
use crate::services::market_sim::{delta, up_to};

/// Rows rendered in the results table; the count badge reports all matches.
pub const DISPLAY_LIMIT: usize = 20;

pub const UNIVERSE: [(&str, &str); 15] = [
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("MSFT", "Microsoft Corp."),
    ("TSLA", "Tesla Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("NVDA", "NVIDIA Corp."),
    ("META", "Meta Platforms"),
    ("NFLX", "Netflix Inc."),
    ("AMD", "Advanced Micro Devices"),
    ("INTC", "Intel Corp."),
    ("CRM", "Salesforce Inc."),
    ("ORCL", "Oracle Corp."),
    ("ADBE", "Adobe Inc."),
    ("PYPL", "PayPal Holdings"),
    ("UBER", "Uber Technologies"),
];

/// buy 40%, otherwise a second draw: hold 70%, sell 30%.
pub fn draw_signal<R: Rng + ?Sized>(rng: &mut R) -> Signal {
    if rng.gen_range(0.0..1.0) > 0.6 {
        Signal::Buy
    } else if rng.gen_range(0.0..1.0) > 0.3 {
        Signal::Hold
    } else {
        Signal::Sell
    }
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Vec<ScreenerResult> {
    UNIVERSE
        .iter()
        .map(|(symbol, name)| ScreenerResult {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price: up_to(rng, 500.0) + 50.0,
            change: delta(rng, 20.0),
            change_percent: delta(rng, 10.0),
            volume: up_to(rng, 100_000_000.0).floor() as u64,
            market_cap: up_to(rng, 2_000_000_000_000.0).floor() as u64,
            pe: up_to(rng, 40.0) + 5.0,
            rsi: up_to(rng, 100.0),
            signal: draw_signal(rng),
        })
        .collect()
}

fn within(v: f64, lo: f64, hi: f64) -> bool {
    v >= lo && v <= hi
}

pub fn matches(r: &ScreenerResult, f: &ScreenerFilters) -> bool {
    within(r.price, f.min_price, f.max_price)
        && within(r.volume as f64, f.min_volume, f.max_volume)
        && within(r.rsi, f.min_rsi, f.max_rsi)
        && within(r.pe, f.min_pe, f.max_pe)
}

/// Every matching row, sorted. Ties keep their universe order.
pub fn screen(
    rows: &[ScreenerResult],
    filters: &ScreenerFilters,
    field: SortField,
    order: SortOrder,
) -> Vec<ScreenerResult> {
    let mut out: Vec<ScreenerResult> = rows.iter().filter(|r| matches(r, filters)).cloned().collect();

    out.sort_by(|a, b| {
        let ord = field.value(a).total_cmp(&field.value(b));
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    out
}
