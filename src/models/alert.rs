use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Triggered,
    Disabled,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Triggered => "triggered",
            AlertStatus::Disabled => "disabled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertStatus::Active => "Active",
            AlertStatus::Triggered => "Triggered",
            AlertStatus::Disabled => "Disabled",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notifications {
    pub in_app: bool,
    pub web_push: bool,
    pub email: bool,
    // empty = no webhook
    pub webhook: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub name: String,
    pub symbol: String,

    // "Price Above" | "RSI Below" | ...
    pub condition: String,
    pub trigger_level: f64,

    // Disabling pauses the alert without forgetting that it fired.
    pub enabled: bool,
    pub triggered: bool,
    pub last_triggered: Option<i64>,

    pub notifications: Notifications,
    pub created_at: i64,
}

impl Alert {
    pub fn status(&self) -> AlertStatus {
        if !self.enabled {
            AlertStatus::Disabled
        } else if self.triggered {
            AlertStatus::Triggered
        } else {
            AlertStatus::Active
        }
    }
}
