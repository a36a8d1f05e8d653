use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        service_key, NewSubscription, ReminderPreference, Subscription, SubscriptionWithOwner,
        User,
    },
    services::overlap::check_overlap,
};

use super::{SubscriptionStore, UserStore};

/// In-process store backed by a shared lock
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: HashMap<Uuid, User>,
    /// Insertion order is the natural order used to break expiry ties
    subscriptions: Vec<Subscription>,
}

impl MemoryStoreInner {
    fn latest_for_service(&self, user_id: Uuid, service_name: &str) -> Option<&Subscription> {
        let key = service_key(service_name);
        self.subscriptions
            .iter()
            .filter(|s| s.user_id == user_id && service_key(&s.service_name) == key)
            .max_by_key(|s| s.expiry_date)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user; accounts are created outside this service
    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }
}

fn sorted_by_expiry(mut subs: Vec<Subscription>) -> Vec<Subscription> {
    subs.sort_by_key(|s| s.expiry_date);
    subs
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn latest_for_service(
        &self,
        user_id: Uuid,
        service_name: &str,
    ) -> AppResult<Option<Subscription>> {
        let inner = self.inner.read().await;
        Ok(inner.latest_for_service(user_id, service_name).cloned())
    }

    async fn insert_if_no_overlap(&self, new: NewSubscription) -> AppResult<Subscription> {
        let mut inner = self.inner.write().await;
        check_overlap(
            inner.latest_for_service(new.user_id, &new.service_name),
            &new,
        )?;

        let subscription = new.into_subscription();
        inner.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let inner = self.inner.read().await;
        Ok(sorted_by_expiry(
            inner
                .subscriptions
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        let inner = self.inner.read().await;
        Ok(inner.subscriptions.iter().find(|s| s.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.subscriptions.len();
        inner.subscriptions.retain(|s| s.id != id);
        Ok(inner.subscriptions.len() < before)
    }

    async fn expiring_for_user(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Subscription>> {
        let inner = self.inner.read().await;
        Ok(sorted_by_expiry(
            inner
                .subscriptions
                .iter()
                .filter(|s| s.user_id == user_id && (from..=to).contains(&s.expiry_date))
                .cloned()
                .collect(),
        ))
    }

    async fn expiring_with_owners(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<SubscriptionWithOwner>> {
        let inner = self.inner.read().await;
        let subs = sorted_by_expiry(
            inner
                .subscriptions
                .iter()
                .filter(|s| (from..=to).contains(&s.expiry_date))
                .cloned()
                .collect(),
        );

        Ok(subs
            .into_iter()
            .filter_map(|subscription| {
                let owner = inner.users.get(&subscription.user_id)?.owner();
                Some(SubscriptionWithOwner {
                    subscription,
                    owner,
                })
            })
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn reminder_preference(&self, user_id: Uuid) -> AppResult<ReminderPreference> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(&user_id)
            .map(|u| ReminderPreference {
                reminders_enabled: u.reminders_enabled,
            })
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn set_reminder_preference(
        &self,
        user_id: Uuid,
        enabled: bool,
    ) -> AppResult<ReminderPreference> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.reminders_enabled = enabled;
        Ok(ReminderPreference {
            reminders_enabled: enabled,
        })
    }
}
