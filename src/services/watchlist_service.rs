use rand::Rng;

use crate::models::{Sector, WatchlistItem};
use crate::services::market_sim::{delta, perturb_quote, up_to};

/// Weight of the price move carried into the day change on each tick.
const CHANGE_WEIGHT: f64 = 0.5;

/// Symbols offered by the add-symbol search box.
pub const SEARCH_UNIVERSE: [&str; 10] = [
    "NVDA", "META", "AMZN", "NFLX", "AMD", "INTC", "CRM", "ORCL", "HON", "QCOM",
];

#[derive(Debug, Clone)]
pub struct Watchlist {
    items: Vec<WatchlistItem>,
}

fn item(
    symbol: &str,
    name: &str,
    sector: Sector,
    price: f64,
    change: f64,
    change_percent: f64,
    volume: u64,
    is_favorite: bool,
) -> WatchlistItem {
    WatchlistItem {
        symbol: symbol.to_string(),
        name: name.to_string(),
        sector,
        price,
        change,
        change_percent,
        volume,
        is_favorite,
    }
}

impl Watchlist {
    pub fn seeded() -> Self {
        Self {
            items: vec![
                item("CARL-A", "Carlsberg Group A/S", Sector::Beverages, 895.50, 12.30, 1.39, 234_567, true),
                item("CARL-B", "Carlsberg Group B/S", Sector::Beverages, 847.20, -5.80, -0.68, 156_789, true),
                item("HEINA", "Heineken N.V.", Sector::Beverages, 78.45, 2.15, 2.82, 345_678, false),
                item("BUD", "Anheuser-Busch InBev", Sector::Beverages, 54.32, -1.23, -2.21, 567_890, false),
                item("^IXIC", "NASDAQ Composite", Sector::Index, 15224.11, 45.23, 0.3, 0, true),
            ],
        }
    }

    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&WatchlistItem> {
        self.items.iter().find(|i| i.symbol == symbol)
    }

    /// One live tick over every row. Volume is left alone.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for it in &mut self.items {
            let step = perturb_quote(rng, it.price, it.change, CHANGE_WEIGHT);
            it.price = step.price;
            it.change = step.change;
            it.change_percent = step.change_percent;
        }
    }

    /// Adds a mock instrument with random sector and figures.
    pub fn add<R: Rng + ?Sized>(&mut self, symbol: &str, rng: &mut R) -> Result<&WatchlistItem, String> {
        let sym = symbol.trim().to_uppercase();
        if sym.is_empty() {
            return Err("Enter a symbol to add.".to_string());
        }
        if self.get(&sym).is_some() {
            return Err(format!("{sym} is already on the watchlist."));
        }

        let sector = Sector::ALL[rng.gen_range(0..Sector::ALL.len())];
        let new_item = WatchlistItem {
            name: format!("{sym} Corp."),
            symbol: sym,
            sector,
            price: up_to(rng, 500.0) + 50.0,
            change: delta(rng, 10.0),
            change_percent: delta(rng, 5.0),
            volume: up_to(rng, 100_000_000.0).floor() as u64,
            is_favorite: false,
        };

        self.items.push(new_item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.symbol != symbol);
        self.items.len() != before
    }

    /// Returns the new favorite flag, `None` if the symbol is not listed.
    pub fn toggle_favorite(&mut self, symbol: &str) -> Option<bool> {
        let it = self.items.iter_mut().find(|i| i.symbol == symbol)?;
        it.is_favorite = !it.is_favorite;
        Some(it.is_favorite)
    }

    /// `None` means "All".
    pub fn filtered(&self, sector: Option<Sector>) -> Vec<&WatchlistItem> {
        self.items
            .iter()
            .filter(|i| sector.is_none_or(|s| i.sector == s))
            .collect()
    }
}

/// Case-insensitive substring match over [`SEARCH_UNIVERSE`].
pub fn search(query: &str) -> Vec<&'static str> {
    if query.is_empty() {
        return Vec::new();
    }
    let q = query.to_lowercase();
    SEARCH_UNIVERSE
        .into_iter()
        .filter(|s| s.to_lowercase().contains(&q))
        .collect()
}
