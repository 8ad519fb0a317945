//! Notification dispatch: resolve the cohort, load the wardrobe once, then
//! process each user to completion (weather lookup, outfit matching,
//! message delivery, audit log) before moving to the next.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::delivery::MessageDelivery;
use crate::message;
use crate::model::{
    ClothingItem, NotificationLogEntry, NotificationOutcome, OutcomeStatus, RunSummary, User,
};
use crate::outfit::{self, CandidatePicker};
use crate::store::{AuditStore, DispatchFilter, UserStore, WardrobeStore};
use crate::weather::WeatherLookup;

/// Orchestrates one dispatch run. Holds only shared read-only collaborators
/// plus the tie-break picker; all per-user state is local to the loop.
pub struct Dispatcher {
    users: Arc<dyn UserStore>,
    wardrobe: Arc<dyn WardrobeStore>,
    audit: Arc<dyn AuditStore>,
    weather: Arc<dyn WeatherLookup>,
    delivery: Arc<dyn MessageDelivery>,
    media_base_url: String,
    picker: Box<dyn CandidatePicker + Send>,
}

impl Dispatcher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        wardrobe: Arc<dyn WardrobeStore>,
        audit: Arc<dyn AuditStore>,
        weather: Arc<dyn WeatherLookup>,
        delivery: Arc<dyn MessageDelivery>,
        media_base_url: String,
        picker: Box<dyn CandidatePicker + Send>,
    ) -> Self {
        Self {
            users,
            wardrobe,
            audit,
            weather,
            delivery,
            media_base_url,
            picker,
        }
    }

    /// Run one dispatch. An empty cohort is a successful no-op; an empty
    /// wardrobe catalog fails the whole run before any user is attempted.
    /// Per-user failures are isolated: recorded in the outcome list, never
    /// aborting the remaining users.
    pub async fn run(&mut self, filter: &DispatchFilter) -> Result<RunSummary> {
        let users = self.users.eligible(filter).await?;
        if users.is_empty() {
            info!("no eligible users for this run");
            return Ok(RunSummary::empty_audience());
        }

        let catalog = self.wardrobe.all().await?;
        if catalog.is_empty() {
            warn!("wardrobe catalog is empty, aborting run");
            return Ok(RunSummary::empty_catalog());
        }

        info!(users = users.len(), catalog = catalog.len(), "dispatch run started");

        let mut outcomes = Vec::with_capacity(users.len());
        for user in &users {
            match self.notify_user(user, &catalog).await {
                Ok(()) => {
                    debug!(user = %user.id, "notification sent");
                    outcomes.push(NotificationOutcome {
                        user_id: user.id,
                        name: user.name.clone(),
                        status: OutcomeStatus::Sent,
                        error: None,
                    });
                }
                Err(err) => {
                    error!(user = %user.id, error = %format!("{err:#}"), "notification failed");
                    outcomes.push(NotificationOutcome {
                        user_id: user.id,
                        name: user.name.clone(),
                        status: OutcomeStatus::Failed,
                        error: Some(format!("{err:#}")),
                    });
                }
            }
        }

        let sent = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Sent)
            .count();

        Ok(RunSummary {
            success: true,
            message: format!("{sent}명에게 알림을 보냈습니다."),
            sent,
            outcomes,
        })
    }

    /// Process a single user end to end. Any error here is caught by the
    /// run loop and recorded as that user's failed outcome.
    async fn notify_user(&mut self, user: &User, catalog: &[ClothingItem]) -> Result<()> {
        let chat_id = user
            .telegram_chat_id
            .as_deref()
            .context("user has no linked chat")?;
        let latitude = user.latitude.context("user has no coordinates")?;
        let longitude = user.longitude.context("user has no coordinates")?;

        let reading = self
            .weather
            .current(latitude, longitude)
            .await?
            .into_reading();

        let selection = outfit::recommend(
            catalog,
            reading.temperature,
            reading.code,
            user.gender,
            self.picker.as_mut(),
        );

        let city = user.location_name.as_deref().unwrap_or("현재 위치");
        let mut text = message::format_weather(city, &reading);

        if selection.is_empty() {
            self.delivery.send_text(chat_id, &text).await?;
        } else {
            text.push_str(&message::format_outfit(&selection));
            self.delivery.send_text(chat_id, &text).await?;

            for (slot, item) in selection.in_delivery_order() {
                let image_url = format!(
                    "{}/{}",
                    self.media_base_url.trim_end_matches('/'),
                    item.image_url
                );
                let caption = format!("{}: {}", message::slot_label(slot), item.name);
                self.delivery.send_image(chat_id, &image_url, &caption).await?;
            }
        }

        self.audit
            .append(&NotificationLogEntry {
                user_id: user.id,
                weather: reading,
                outfit: selection,
                status: "success".to_string(),
                sent_at: Utc::now(),
            })
            .await?;

        Ok(())
    }
}
