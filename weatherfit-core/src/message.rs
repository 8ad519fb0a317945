//! Renders weather readings and outfit selections into Telegram message
//! bodies. Templates follow the product's Korean copy; the weather section
//! uses Telegram HTML parse mode.

use crate::model::{OutfitSelection, Slot, WeatherReading};

/// Localized caption label for an image of the given slot.
pub fn slot_label(slot: Slot) -> &'static str {
    match slot {
        Slot::Top => "상의",
        Slot::Bottom => "하의",
        Slot::Outer => "외투",
    }
}

/// Weather section of the notification.
pub fn format_weather(city: &str, reading: &WeatherReading) -> String {
    format!(
        "{icon} <b>{city} 오늘의 날씨</b>\n\n\
         🌡️ 기온: <b>{temp}°C</b> (체감 {feels}°C)\n\
         💧 습도: {humidity}%\n\
         🌤️ 날씨: {desc}",
        icon = reading.icon,
        temp = reading.temperature,
        feels = reading.feels_like,
        humidity = reading.humidity,
        desc = reading.description,
    )
}

/// Outfit section, appended after the weather text. One bullet per present
/// slot, always in outer, top, bottom order.
///
/// Caller contract: must not be invoked on an all-absent selection; the
/// dispatcher checks [`OutfitSelection::is_empty`] first and sends the
/// weather text alone in that case.
pub fn format_outfit(selection: &OutfitSelection) -> String {
    let mut message = String::from("\n\n👔 오늘의 추천 옷차림:\n");

    if let Some(outer) = &selection.outer {
        message.push_str(&format!("• 외투: {}\n", outer.name));
    }
    if let Some(top) = &selection.top {
        message.push_str(&format!("• 상의: {}\n", top.name));
    }
    if let Some(bottom) = &selection.bottom {
        message.push_str(&format!("• 하의: {}\n", bottom.name));
    }

    message
}
