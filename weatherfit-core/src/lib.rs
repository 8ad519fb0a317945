//! Core library for the WeatherFit notification service.
//!
//! This crate defines:
//! - Configuration handling
//! - The domain model (users, wardrobe items, weather readings)
//! - Condition normalization and outfit matching
//! - Weather lookup, Telegram delivery and Postgres store clients
//! - The notification dispatcher tying them together
//!
//! It is used by `weatherfit-cli`, but can also be reused by other binaries
//! or services.

pub mod condition;
pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod message;
pub mod model;
pub mod outfit;
pub mod store;
pub mod weather;

pub use condition::ConditionCode;
pub use config::Config;
pub use dispatch::Dispatcher;
pub use model::{
    ClothingItem, Gender, NotificationOutcome, OutfitSelection, RunSummary, Slot, User,
    WeatherReading,
};
pub use store::DispatchFilter;
