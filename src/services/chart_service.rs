//! Random-walk OHLC series behind the live chart.

use std::collections::VecDeque;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Local};
use rand::Rng;
use regex::Regex;
use serde::Serialize;

use crate::models::{ChartLayout, ChartType, DataPoint};
use crate::services::market_sim::{delta, up_to};

/// Rolling window length.
pub const WINDOW: usize = 50;
/// Ticks never run slower than this, whatever the interval label says.
pub const MAX_TICK_MS: u64 = 2000;

const SEED_SPACING_SECS: i64 = 5;
const BASE_PRICE_MIN: f64 = 850.0;
const BASE_PRICE_MAX: f64 = 950.0;

pub const DEFAULT_SYMBOL: &str = "CARL-A";
pub const DEFAULT_INTERVAL: &str = "5m";

pub const SYMBOLS: [(&str, &str); 7] = [
    ("CARL-A", "Carlsberg Group A/S"),
    ("MSFT", "Microsoft Corp."),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("TSMC", "Taiwan Semiconductor"),
    ("^IXIC", "NASDAQ Composite"),
    ("^GSPC", "S&P 500"),
];

pub const INTERVALS: [&str; 7] = ["1m", "5m", "15m", "30m", "1h", "4h", "1d"];

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9]").expect("static regex"));

pub fn symbol_name(symbol: &str) -> Option<&'static str> {
    SYMBOLS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, name)| *name)
}

/// Interval label to milliseconds: digits only, seconds when the label
/// contains an `s`, minutes otherwise (`"1h"` is therefore one minute).
pub fn parse_interval_ms(label: &str) -> Option<u64> {
    let digits = NON_DIGITS.replace_all(label, "");
    let n: u64 = digits.parse().ok()?;
    let unit = if label.contains('s') { 1_000 } else { 60_000 };
    n.checked_mul(unit)
}

/// Time between live ticks for an interval label.
pub fn tick_period(label: &str) -> Duration {
    let ms = parse_interval_ms(label)
        .filter(|ms| *ms > 0)
        .map_or(MAX_TICK_MS, |ms| ms.min(MAX_TICK_MS));
    Duration::from_millis(ms)
}

fn time_label(t: DateTime<Local>) -> String {
    t.format("%-I:%M:%S %p").to_string()
}

#[derive(Debug, Clone)]
pub struct ChartSeries {
    symbol: String,
    points: VecDeque<DataPoint>,
}

impl ChartSeries {
    /// 50 points walking from a base in [850, 950), spaced 5 s apart and
    /// ending just before `now`.
    pub fn seed<R: Rng + ?Sized>(symbol: &str, rng: &mut R, now: DateTime<Local>) -> Self {
        let mut points = VecDeque::with_capacity(WINDOW + 1);
        let mut base = rng.gen_range(BASE_PRICE_MIN..BASE_PRICE_MAX);

        for i in 0..WINDOW {
            let at = now - chrono::Duration::seconds((WINDOW - i) as i64 * SEED_SPACING_SECS);
            let change = delta(rng, 4.0);
            base += change;

            points.push_back(DataPoint {
                time: time_label(at),
                price: base,
                volume: up_to(rng, 1_000_000.0),
                high: base + up_to(rng, 2.0),
                low: base - up_to(rng, 2.0),
                open: base - change,
                close: base,
            });
        }

        Self {
            symbol: symbol.to_string(),
            points,
        }
    }

    /// Appends one point continuing from the last price and drops the oldest
    /// beyond the window. Prices are not bounded below.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Local>) -> &DataPoint {
        let prev = match self.points.back() {
            Some(p) => p.price,
            None => rng.gen_range(BASE_PRICE_MIN..BASE_PRICE_MAX),
        };
        let price = prev + delta(rng, 3.0);

        self.points.push_back(DataPoint {
            time: time_label(now),
            price,
            volume: up_to(rng, 1_000_000.0),
            high: price + up_to(rng, 1.5),
            low: price - up_to(rng, 1.5),
            open: prev,
            close: price,
        });

        while self.points.len() > WINDOW {
            self.points.pop_front();
        }

        &self.points[self.points.len() - 1]
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&DataPoint> {
        self.points.back()
    }

    pub fn points(&self) -> Vec<DataPoint> {
        self.points.iter().cloned().collect()
    }
}

/// Everything the chart module remembers between requests.
#[derive(Debug, Clone)]
pub struct ChartState {
    pub series: ChartSeries,
    pub interval: String,
    pub chart_type: ChartType,
    pub real_time: bool,
    pub auto_save: bool,
    pub layout: ChartLayout,
    pub last_update: DateTime<Local>,
}

impl ChartState {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Local>) -> Self {
        Self {
            series: ChartSeries::seed(DEFAULT_SYMBOL, rng, now),
            interval: DEFAULT_INTERVAL.to_string(),
            chart_type: ChartType::default(),
            real_time: true,
            auto_save: true,
            layout: ChartLayout::default(),
            last_update: now,
        }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }

    /// Reseeds the series when the symbol actually changes. Unknown symbols
    /// are ignored.
    pub fn set_symbol<R: Rng + ?Sized>(
        &mut self,
        symbol: &str,
        rng: &mut R,
        now: DateTime<Local>,
    ) -> bool {
        let sym = symbol.trim().to_uppercase();
        if symbol_name(&sym).is_none() || sym == self.series.symbol() {
            return false;
        }
        self.series = ChartSeries::seed(&sym, rng, now);
        self.last_update = now;
        true
    }

    /// Changing the interval only changes the tick rate; the series is kept.
    pub fn set_interval(&mut self, interval: &str) -> bool {
        let iv = interval.trim();
        if !INTERVALS.contains(&iv) {
            return false;
        }
        self.interval = iv.to_string();
        true
    }

    pub fn tick_period(&self) -> Duration {
        tick_period(&self.interval)
    }

    /// No-op while real-time updates are paused.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Local>) -> bool {
        if !self.real_time {
            return false;
        }
        self.series.tick(rng, now);
        self.last_update = now;
        true
    }
}

/// Static company figures shown above the chart.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: &'static str,
    pub unit: &'static str,
    pub trend: &'static str,
    pub up: bool,
}

pub const KPI_CARDS: [KpiCard; 5] = [
    KpiCard { label: "2024 Revenue", value: "74.1B", unit: "DKK", trend: "5.2%", up: true },
    KpiCard { label: "Global Beverage Volume", value: "118.8M", unit: "hl", trend: "2.1%", up: true },
    KpiCard { label: "Operating Margin", value: "17.3%", unit: "EBITDA", trend: "0.8%", up: false },
    KpiCard { label: "CO₂ Emissions Reduction", value: "-28%", unit: "vs 2015 baseline", trend: "Target", up: true },
    KpiCard { label: "Dividend Yield", value: "2.35%", unit: "Annual", trend: "0.15%", up: true },
];

pub const SHAREGRAPH_URL: &str = "https://tools.euroland.com/sharegraph/?s=770&companycode=dk-cbg&lang=en-gb";
