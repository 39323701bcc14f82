use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Sidebar destinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    #[default]
    Dashboard,
    Charts,
    Watchlist,
    Alerts,
    Screener,
    Sharing,
}

impl Module {
    pub const SIDEBAR: [Module; 5] = [
        Module::Dashboard,
        Module::Watchlist,
        Module::Alerts,
        Module::Screener,
        Module::Sharing,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Charts => "charts",
            Module::Watchlist => "watchlist",
            Module::Alerts => "alerts",
            Module::Screener => "screener",
            Module::Sharing => "sharing",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Charts => "Charts",
            Module::Watchlist => "Watchlist",
            Module::Alerts => "Price Alerts",
            Module::Screener => "Market Screener",
            Module::Sharing => "Internal Reports",
        }
    }

    /// Unknown names land on the dashboard, like the sidebar's default.
    pub fn parse(s: &str) -> Module {
        match s.trim().to_lowercase().as_str() {
            "charts" => Module::Charts,
            "watchlist" => Module::Watchlist,
            "alerts" => Module::Alerts,
            "screener" => Module::Screener,
            "sharing" => Module::Sharing,
            _ => Module::Dashboard,
        }
    }
}
