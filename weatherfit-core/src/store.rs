use async_trait::async_trait;
use chrono::NaiveTime;
use uuid::Uuid;

use crate::model::{ClothingItem, NotificationLogEntry, User};

pub mod postgres;

/// Narrows the dispatch cohort. With no time filter, every eligible user is
/// targeted regardless of their configured notification time (the intended
/// "send now" path for manual runs).
#[derive(Debug, Clone, Default)]
pub struct DispatchFilter {
    /// Exact notification time-of-day match.
    pub time: Option<NaiveTime>,
    /// Restrict to a single user, for manual or test invocations.
    pub user_id: Option<Uuid>,
}

impl DispatchFilter {
    pub fn at(time: NaiveTime) -> Self {
        Self {
            time: Some(time),
            user_id: None,
        }
    }

    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            time: None,
            user_id: Some(user_id),
        }
    }
}

/// User records, already narrowed to dispatch-eligible rows: active, chat
/// linked, coordinates present.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn eligible(&self, filter: &DispatchFilter) -> anyhow::Result<Vec<User>>;
}

/// The shared wardrobe catalog. Loaded once per run, read-only afterwards.
#[async_trait]
pub trait WardrobeStore: Send + Sync {
    async fn all(&self) -> anyhow::Result<Vec<ClothingItem>>;
}

/// Append-only notification audit log. Written on the success path only;
/// failed attempts are visible in the run summary but leave no record here.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: &NotificationLogEntry) -> anyhow::Result<()>;
}
