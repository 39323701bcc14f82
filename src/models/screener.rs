use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerResult {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: u64,
    pub pe: f64,
    pub rsi: f64,
    // drawn at random, not derived from rsi/pe
    pub signal: Signal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    ChangePercent,
    Volume,
    Price,
    MarketCap,
    Pe,
    Rsi,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::ChangePercent,
        SortField::Volume,
        SortField::Price,
        SortField::MarketCap,
        SortField::Pe,
        SortField::Rsi,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SortField::ChangePercent => "changePercent",
            SortField::Volume => "volume",
            SortField::Price => "price",
            SortField::MarketCap => "marketCap",
            SortField::Pe => "pe",
            SortField::Rsi => "rsi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::ChangePercent => "Change %",
            SortField::Volume => "Volume",
            SortField::Price => "Price",
            SortField::MarketCap => "Market Cap",
            SortField::Pe => "P/E Ratio",
            SortField::Rsi => "RSI",
        }
    }

    pub fn parse(s: &str) -> Option<SortField> {
        SortField::ALL.into_iter().find(|f| f.key() == s.trim())
    }

    pub fn value(&self, r: &ScreenerResult) -> f64 {
        match self {
            SortField::ChangePercent => r.change_percent,
            SortField::Volume => r.volume as f64,
            SortField::Price => r.price,
            SortField::MarketCap => r.market_cap as f64,
            SortField::Pe => r.pe,
            SortField::Rsi => r.rsi,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<SortOrder> {
        match s.trim() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Inclusive ranges; a row passes only if every range holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerFilters {
    pub min_price: f64,
    pub max_price: f64,
    pub min_volume: f64,
    pub max_volume: f64,
    pub min_rsi: f64,
    pub max_rsi: f64,
    pub min_pe: f64,
    pub max_pe: f64,
}

impl Default for ScreenerFilters {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: 1000.0,
            min_volume: 0.0,
            max_volume: 100_000_000.0,
            min_rsi: 0.0,
            max_rsi: 100.0,
            min_pe: 0.0,
            max_pe: 50.0,
        }
    }
}
