use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::models::{ListingQuote, TopTicker};
use crate::services::market_sim::{delta, perturb_quote};

/// Login ticker: weight of the price move carried into the day change.
const LISTING_CHANGE_WEIGHT: f64 = 0.3;

pub const DEFAULT_LISTING: &str = "CARL-A.CPH";

pub type SharedLoginTicker = Arc<RwLock<LoginTicker>>;

fn listing(
    symbol: &str,
    exchange: &str,
    price: f64,
    change: f64,
    change_percent: f64,
    currency: &str,
    last_update: &str,
) -> ListingQuote {
    ListingQuote {
        symbol: symbol.to_string(),
        exchange: exchange.to_string(),
        price,
        change,
        change_percent,
        currency: currency.to_string(),
        last_update: last_update.to_string(),
    }
}

fn base_listings() -> Vec<ListingQuote> {
    vec![
        listing("CARL-A.CPH", "Nasdaq Copenhagen", 1196.50, 12.30, 1.04, "DKK", "2m ago"),
        listing("CARL-B.CPH", "Nasdaq Copenhagen", 1142.00, -8.50, -0.74, "DKK", "2m ago"),
        listing("CABGY", "OTC US", 17.82, 0.10, 0.56, "USD", "15m ago"),
        listing("CABGF", "OTC US", 17.65, -0.08, -0.45, "USD", "15m ago"),
        listing("CARLS.L", "London Stock Exchange", 14.23, 0.05, 0.35, "GBP", "5m ago"),
    ]
}

/// Live quotes behind the login page's share-price card. The feed is shared;
/// which listing a visitor looks at is kept on their side.
#[derive(Debug, Clone)]
pub struct LoginTicker {
    listings: Vec<ListingQuote>,
}

impl Default for LoginTicker {
    fn default() -> Self {
        Self {
            listings: base_listings(),
        }
    }
}

impl LoginTicker {
    pub fn shared() -> SharedLoginTicker {
        Arc::new(RwLock::new(LoginTicker::default()))
    }

    pub fn listings(&self) -> &[ListingQuote] {
        &self.listings
    }

    pub fn find(&self, symbol: &str) -> Option<&ListingQuote> {
        self.listings.iter().find(|l| l.symbol == symbol.trim())
    }

    /// Quote for a visitor's selection, the default listing when there is none
    /// or it is unknown.
    pub fn quote(&self, selected: Option<&str>) -> &ListingQuote {
        selected
            .and_then(|s| self.find(s))
            .or_else(|| self.find(DEFAULT_LISTING))
            .unwrap_or(&self.listings[0])
    }

    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for l in &mut self.listings {
            let step = perturb_quote(rng, l.price, l.change, LISTING_CHANGE_WEIGHT);
            l.price = step.price;
            l.change = step.change;
            l.change_percent = step.change_percent;
            l.last_update = "Just now".to_string();
        }
    }
}

/// Top-bar tick: share price, its change and the index each take their own draw.
pub fn perturb_top<R: Rng + ?Sized>(t: &mut TopTicker, rng: &mut R) {
    t.share_price += delta(rng, 2.0);
    t.share_change += delta(rng, 0.5);
    t.index_level += delta(rng, 50.0);
    t.last_sync_secs = 0;
}

pub fn bump_sync(t: &mut TopTicker) {
    t.last_sync_secs = t.last_sync_secs.saturating_add(1);
}
