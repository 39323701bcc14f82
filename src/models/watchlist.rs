use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    Beverages,
    Technology,
    #[serde(rename = "Supply Chain")]
    SupplyChain,
    Index,
}

impl Sector {
    pub const ALL: [Sector; 4] = [
        Sector::Beverages,
        Sector::Technology,
        Sector::SupplyChain,
        Sector::Index,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sector::Beverages => "Beverages",
            Sector::Technology => "Technology",
            Sector::SupplyChain => "Supply Chain",
            Sector::Index => "Index",
        }
    }

    /// `None` for "All" and anything unrecognised.
    pub fn parse(s: &str) -> Option<Sector> {
        Sector::ALL
            .into_iter()
            .find(|sec| sec.label().eq_ignore_ascii_case(s.trim()))
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            Sector::Beverages => "badge-amber",
            Sector::Technology => "badge-blue",
            Sector::SupplyChain => "badge-green",
            Sector::Index => "badge-purple",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub symbol: String,
    pub name: String,
    pub sector: Sector,

    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,

    pub is_favorite: bool,
}
