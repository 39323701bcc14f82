pub mod market_sim;

pub mod alerts_service;
pub mod auth_service;
pub mod chart_service;
pub mod screener_service;
pub mod session_service;
pub mod sharing_service;
pub mod ticker_service;
pub mod watchlist_service;

pub mod timers;
