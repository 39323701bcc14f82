use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Alert, AlertStatus, Notifications};

pub const CONDITIONS: [&str; 8] = [
    "Price Above",
    "Price Below",
    "RSI Above",
    "RSI Below",
    "MACD Cross Up",
    "MACD Cross Down",
    "Volume Above",
    "Volume Below",
];

pub const SYMBOLS: [&str; 7] = ["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN", "NVDA", "META"];

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("static regex")
});

/// Parses the longest numeric prefix (`"12.5abc"` is 12.5); anything without
/// one, or that parses to zero, becomes 0.
pub fn parse_float_or_zero(raw: &str) -> f64 {
    LEADING_NUMBER
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}

/// Raw create-form input. The trigger level stays a string until it is coerced.
#[derive(Debug, Clone, Default)]
pub struct NewAlert {
    pub name: String,
    pub symbol: String,
    pub condition: String,
    pub trigger_level: String,
    pub notifications: Notifications,
}

#[derive(Debug, Clone)]
pub struct AlertBook {
    alerts: Vec<Alert>,
    next_id: u64,
}

impl AlertBook {
    pub fn seeded(now: i64) -> Self {
        let alerts = vec![
            Alert {
                id: "1".to_string(),
                name: "AAPL Price Alert".to_string(),
                symbol: "AAPL".to_string(),
                condition: "Price Above".to_string(),
                trigger_level: 180.0,
                enabled: true,
                triggered: false,
                last_triggered: None,
                notifications: Notifications {
                    in_app: true,
                    web_push: true,
                    email: false,
                    webhook: String::new(),
                },
                created_at: now,
            },
            Alert {
                id: "2".to_string(),
                name: "TSLA RSI Alert".to_string(),
                symbol: "TSLA".to_string(),
                condition: "RSI Above".to_string(),
                trigger_level: 70.0,
                enabled: true,
                triggered: true,
                last_triggered: Some(now - 3600),
                notifications: Notifications {
                    in_app: true,
                    web_push: false,
                    email: true,
                    webhook: "https://webhook.example.com".to_string(),
                },
                created_at: now,
            },
        ];

        Self { alerts, next_id: 3 }
    }

    pub fn list(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// New alerts start active. Name, symbol and condition are required; the
    /// trigger level is parse-or-zero.
    pub fn create(&mut self, input: NewAlert, now: i64) -> Result<&Alert, String> {
        let name = input.name.trim();
        let symbol = input.symbol.trim();
        let condition = input.condition.trim();
        if name.is_empty() || symbol.is_empty() || condition.is_empty() {
            return Err("Name, symbol and condition are required.".to_string());
        }

        let id = self.next_id.to_string();
        self.next_id += 1;

        self.alerts.push(Alert {
            id,
            name: name.to_string(),
            symbol: symbol.to_uppercase(),
            condition: condition.to_string(),
            trigger_level: parse_float_or_zero(&input.trigger_level),
            enabled: true,
            triggered: false,
            last_triggered: None,
            notifications: input.notifications,
            created_at: now,
        });

        Ok(&self.alerts[self.alerts.len() - 1])
    }

    /// Flips enabled/disabled and returns the resulting status.
    pub fn toggle(&mut self, id: &str) -> Option<AlertStatus> {
        let a = self.alerts.iter_mut().find(|a| a.id == id)?;
        a.enabled = !a.enabled;
        Some(a.status())
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }
}
