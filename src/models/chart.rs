use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    // wall-clock label, e.g. "2:30:05 PM"
    pub time: String,
    pub price: f64,
    pub volume: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    #[default]
    Candlestick,
}

impl ChartType {
    pub fn parse(s: &str) -> Option<ChartType> {
        match s.trim() {
            "line" => Some(ChartType::Line),
            "candlestick" => Some(ChartType::Candlestick),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Candlestick => "candlestick",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartLayout {
    #[default]
    Single,
    Grid,
}

impl ChartLayout {
    pub fn parse(s: &str) -> Option<ChartLayout> {
        match s.trim() {
            "single" => Some(ChartLayout::Single),
            "grid" => Some(ChartLayout::Grid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartLayout::Single => "single",
            ChartLayout::Grid => "grid",
        }
    }
}
