use uuid::Uuid;

use crate::{
    db::SubscriptionStore,
    error::{AppError, AppResult},
    models::{CreateSubscriptionRequest, Subscription},
    services::overlap::validate_new_subscription,
};

/// Validates and records a new subscription for `user_id`.
///
/// The store repeats the overlap check as part of the insert, so two racing
/// requests for the same service cannot both succeed.
#[tracing::instrument(skip(store, request))]
pub async fn create_subscription(
    store: &dyn SubscriptionStore,
    user_id: Uuid,
    request: CreateSubscriptionRequest,
) -> AppResult<Subscription> {
    let new = validate_new_subscription(store, user_id, request).await?;
    let subscription = store.insert_if_no_overlap(new).await?;

    tracing::info!(
        subscription_id = %subscription.id,
        service = %subscription.service_name,
        expiry = %subscription.expiry_date,
        "Subscription saved"
    );

    Ok(subscription)
}

/// The user's subscriptions, ascending by expiry
pub async fn list_subscriptions(
    store: &dyn SubscriptionStore,
    user_id: Uuid,
) -> AppResult<Vec<Subscription>> {
    store.list_for_user(user_id).await
}

/// Deletes a subscription owned by `user_id`
#[tracing::instrument(skip(store))]
pub async fn delete_subscription(
    store: &dyn SubscriptionStore,
    user_id: Uuid,
    subscription_id: Uuid,
) -> AppResult<()> {
    let subscription = store
        .find(subscription_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found".to_string()))?;

    if subscription.user_id != user_id {
        tracing::warn!("Attempt to delete another user's subscription");
        return Err(AppError::Forbidden);
    }

    if !store.delete(subscription_id).await? {
        return Err(AppError::NotFound("Not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use tokio_test::{assert_err, assert_ok};

    fn request(service: &str, expiry: &str) -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            service_name: Some(service.to_string()),
            expiry_date: Some(expiry.to_string()),
            plan: Some("Premium".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let created = assert_ok!(
            create_subscription(&store, user_id, request("Netflix", "2025-01-10")).await
        );
        let listed = list_subscriptions(&store, user_id).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_later_expiry_extends_and_earlier_is_rejected() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        assert_ok!(create_subscription(&store, user_id, request("Netflix", "2025-01-10")).await);
        assert_err!(create_subscription(&store, user_id, request("Netflix", "2025-01-10")).await);
        assert_err!(create_subscription(&store, user_id, request("NETFLIX", "2025-01-05")).await);
        assert_ok!(create_subscription(&store, user_id, request("Netflix", "2025-02-10")).await);

        assert_eq!(list_subscriptions(&store, user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_checks_ownership() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let sub = create_subscription(&store, owner, request("Hulu", "2025-01-10"))
            .await
            .unwrap();

        let err = delete_subscription(&store, Uuid::new_v4(), sub.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        assert_ok!(delete_subscription(&store, owner, sub.id).await);

        let err = delete_subscription(&store, owner, sub.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
