//! Postgres-backed stores for users, wardrobe catalog and the audit log.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{AuditStore, DispatchFilter, UserStore, WardrobeStore};
use crate::condition::ConditionCode;
use crate::model::{ClothingItem, Gender, NotificationLogEntry, Slot, User};

/// One pool serves all three store roles.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run database migrations")?;
        Ok(())
    }

    /// Insert a small realistic wardrobe, for fresh deployments. Idempotent
    /// per item name.
    pub async fn seed_wardrobe(&self) -> anyhow::Result<usize> {
        let items: &[(&str, &str, i32, i32, Option<&str>, Option<&str>)] = &[
            ("top", "티셔츠", 18, 30, None, None),
            ("top", "맨투맨", 8, 18, None, None),
            ("top", "니트", 0, 12, None, None),
            ("top", "우비", 5, 20, Some("rain"), None),
            ("top", "블라우스", 15, 28, None, Some("female")),
            ("bottom", "반바지", 22, 40, None, None),
            ("bottom", "청바지", 5, 24, None, None),
            ("bottom", "기모바지", -15, 8, None, None),
            ("outer", "바람막이", 10, 20, None, None),
            ("outer", "코트", 2, 12, None, None),
            ("outer", "패딩", -20, 5, None, None),
        ];

        let mut inserted = 0usize;
        for (slot, name, min, max, condition, gender) in items {
            let result = sqlx::query(
                r#"
                INSERT INTO clothes
                (id, category, name, image_url, temperature_min, temperature_max, weather_condition, gender)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(slot)
            .bind(name)
            .bind(format!("clothes/{name}.jpg"))
            .bind(min)
            .bind(max)
            .bind(condition)
            .bind(gender)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() > 0 {
                inserted += 1;
            }
        }

        Ok(inserted)
    }
}

fn slot_from_row(value: &str) -> anyhow::Result<Slot> {
    match value {
        "top" => Ok(Slot::Top),
        "bottom" => Ok(Slot::Bottom),
        "outer" => Ok(Slot::Outer),
        other => anyhow::bail!("unknown clothing category in database: {other}"),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn eligible(&self, filter: &DispatchFilter) -> anyhow::Result<Vec<User>> {
        let mut query = String::from(
            "SELECT id, name, telegram_chat_id, gender, location_name, \
             latitude, longitude, notification_time, is_active \
             FROM users \
             WHERE is_active = TRUE \
             AND telegram_chat_id IS NOT NULL \
             AND latitude IS NOT NULL AND longitude IS NOT NULL",
        );

        if filter.time.is_some() {
            query.push_str(" AND notification_time = $1");
            if filter.user_id.is_some() {
                query.push_str(" AND id = $2");
            }
        } else if filter.user_id.is_some() {
            query.push_str(" AND id = $1");
        }

        let mut rows = sqlx::query(&query);
        if let Some(time) = filter.time {
            rows = rows.bind(time);
        }
        if let Some(user_id) = filter.user_id {
            rows = rows.bind(user_id);
        }

        let records = rows
            .fetch_all(&self.pool)
            .await
            .context("failed to query eligible users")?;

        let mut users = Vec::with_capacity(records.len());
        for row in records {
            let gender: Option<String> = row.get("gender");
            users.push(User {
                id: row.get("id"),
                name: row.get("name"),
                telegram_chat_id: row.get("telegram_chat_id"),
                gender: Gender::parse(gender.as_deref()),
                location_name: row.get("location_name"),
                latitude: row.get("latitude"),
                longitude: row.get("longitude"),
                notification_time: row.get("notification_time"),
                is_active: row.get("is_active"),
            });
        }

        Ok(users)
    }
}

#[async_trait]
impl WardrobeStore for PgStore {
    async fn all(&self) -> anyhow::Result<Vec<ClothingItem>> {
        let records = sqlx::query(
            "SELECT id, category, name, image_url, temperature_min, temperature_max, \
             weather_condition, gender \
             FROM clothes",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to load wardrobe catalog")?;

        let mut items = Vec::with_capacity(records.len());
        for row in records {
            let category: String = row.get("category");
            let condition: Option<String> = row.get("weather_condition");
            let gender: Option<String> = row.get("gender");
            items.push(ClothingItem {
                id: row.get("id"),
                slot: slot_from_row(&category)?,
                name: row.get("name"),
                image_url: row.get("image_url"),
                temperature_min: row.get("temperature_min"),
                temperature_max: row.get("temperature_max"),
                weather_condition: ConditionCode::parse(condition.as_deref()),
                gender: Gender::parse(gender.as_deref()),
            });
        }

        Ok(items)
    }
}

#[async_trait]
impl AuditStore for PgStore {
    async fn append(&self, entry: &NotificationLogEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_logs
            (id, user_id, weather_data, recommended_clothes, status, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(serde_json::to_value(&entry.weather).context("failed to serialize weather snapshot")?)
        .bind(serde_json::to_value(&entry.outfit).context("failed to serialize outfit selection")?)
        .bind(&entry.status)
        .bind(entry.sent_at)
        .execute(&self.pool)
        .await
        .context("failed to append notification log entry")?;

        Ok(())
    }
}
