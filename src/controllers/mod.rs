pub mod home_controller;
pub mod auth_controller;
pub mod session_controller;
pub mod charts_controller;
pub mod watchlist_controller;
pub mod alerts_controller;
pub mod screener_controller;
pub mod sharing_controller;
pub mod realtime_controller;
