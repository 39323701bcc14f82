use serde::{Deserialize, Serialize};

/// One listing of the group's share shown on the login page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingQuote {
    pub symbol: String,
    pub exchange: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
    pub last_update: String,
}

/// Share price + index strip in the top navigation bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTicker {
    pub share_price: f64,
    pub share_change: f64,
    pub index_level: f64,
    pub last_sync_secs: u64,
}

impl Default for TopTicker {
    fn default() -> Self {
        Self {
            share_price: 195.35,
            share_change: -1.21,
            index_level: 15224.11,
            last_sync_secs: 0,
        }
    }
}
