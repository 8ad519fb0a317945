use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::condition::ConditionCode;

/// Gender attribute shared by users (preference) and clothing items
/// (restriction). `Unisex` and an unset value both mean "applies to all".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        }
    }

    /// Parse a stored gender value; unknown or empty strings count as unset.
    pub fn parse(value: Option<&str>) -> Option<Gender> {
        match value {
            Some("male") => Some(Gender::Male),
            Some("female") => Some(Gender::Female),
            Some("unisex") => Some(Gender::Unisex),
            _ => None,
        }
    }
}

/// One of the three clothing categories an outfit selection fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Top,
    Bottom,
    Outer,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Top => "top",
            Slot::Bottom => "bottom",
            Slot::Outer => "outer",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user, as stored by the account service.
///
/// Only users that pass [`User::is_eligible`] are ever handed to the
/// dispatcher: active, with a linked Telegram chat and known coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub telegram_chat_id: Option<String>,
    pub gender: Option<Gender>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notification_time: NaiveTime,
    pub is_active: bool,
}

impl User {
    pub fn is_eligible(&self) -> bool {
        self.is_active
            && self.telegram_chat_id.is_some()
            && self.latitude.is_some()
            && self.longitude.is_some()
    }
}

/// A wardrobe catalog entry. Static reference data, read-only during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: Uuid,
    pub slot: Slot,
    pub name: String,
    /// Storage path, resolved against the configured media base URL.
    pub image_url: String,
    /// Inclusive temperature range in °C.
    pub temperature_min: i32,
    pub temperature_max: i32,
    /// Required condition code; `None` means the item suits any weather.
    pub weather_condition: Option<ConditionCode>,
    pub gender: Option<Gender>,
}

/// Point-in-time weather snapshot prepared for matching and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Rounded to whole degrees Celsius.
    pub temperature: i32,
    pub feels_like: i32,
    pub humidity: u8,
    /// Raw provider label, e.g. "Rain".
    pub condition_label: String,
    /// Localized human-readable description, e.g. "가벼운 비".
    pub description: String,
    pub code: ConditionCode,
    pub icon: String,
}

/// At most one item per slot; `None` means no eligible item, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutfitSelection {
    pub top: Option<ClothingItem>,
    pub bottom: Option<ClothingItem>,
    pub outer: Option<ClothingItem>,
}

impl OutfitSelection {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.outer.is_none()
    }

    /// Present items in delivery order: outer, top, bottom.
    pub fn in_delivery_order(&self) -> Vec<(Slot, &ClothingItem)> {
        [
            (Slot::Outer, &self.outer),
            (Slot::Top, &self.top),
            (Slot::Bottom, &self.bottom),
        ]
        .into_iter()
        .filter_map(|(slot, item)| item.as_ref().map(|i| (slot, i)))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Sent,
    Failed,
}

/// Per-user result of one dispatch attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub user_id: Uuid,
    pub name: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated result of a dispatch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub success: bool,
    pub message: String,
    pub sent: usize,
    pub outcomes: Vec<NotificationOutcome>,
}

impl RunSummary {
    pub(crate) fn empty_audience() -> Self {
        Self {
            success: true,
            message: "알림을 보낼 사용자가 없습니다.".to_string(),
            sent: 0,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn empty_catalog() -> Self {
        Self {
            success: false,
            message: "등록된 옷이 없습니다.".to_string(),
            sent: 0,
            outcomes: Vec::new(),
        }
    }
}

/// Append-only audit record, one per successful dispatch attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLogEntry {
    pub user_id: Uuid,
    pub weather: WeatherReading,
    pub outfit: OutfitSelection,
    pub status: String,
    pub sent_at: DateTime<Utc>,
}
