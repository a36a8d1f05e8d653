use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{NewSubscription, ReminderPreference, Subscription, SubscriptionWithOwner},
};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::MemoryStore;
pub use postgres::{create_pool, PgStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;

/// Persistence for subscription records
///
/// Service names are matched trimmed and case-insensitively wherever a store
/// looks up records by service.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// The record with the latest expiry for a user and service, if any
    async fn latest_for_service(
        &self,
        user_id: Uuid,
        service_name: &str,
    ) -> AppResult<Option<Subscription>>;

    /// Inserts the record unless an existing one for the same user and service
    /// expires on or after it, in which case `OverlappingPeriod` is returned.
    /// The check and the write happen as one step.
    async fn insert_if_no_overlap(&self, new: NewSubscription) -> AppResult<Subscription>;

    /// All of a user's records, ascending by expiry
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>>;

    async fn find(&self, id: Uuid) -> AppResult<Option<Subscription>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// A user's records expiring within `[from, to]`, ascending by expiry
    async fn expiring_for_user(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Subscription>>;

    /// Every record expiring within `[from, to]` joined with its owner,
    /// ascending by expiry. Records without an owner are left out.
    async fn expiring_with_owners(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<SubscriptionWithOwner>>;
}

/// Access to the user fields this service owns
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn reminder_preference(&self, user_id: Uuid) -> AppResult<ReminderPreference>;

    async fn set_reminder_preference(
        &self,
        user_id: Uuid,
        enabled: bool,
    ) -> AppResult<ReminderPreference>;
}
