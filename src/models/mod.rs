pub mod alert;
pub mod chart;
pub mod screener;
pub mod session;
pub mod ticker;
pub mod watchlist;

pub use alert::{Alert, AlertStatus, Notifications};
pub use chart::{ChartLayout, ChartType, DataPoint};
pub use screener::{ScreenerFilters, ScreenerResult, Signal, SortField, SortOrder};
pub use session::{Module, Theme};
pub use ticker::{ListingQuote, TopTicker};
pub use watchlist::{Sector, WatchlistItem};
