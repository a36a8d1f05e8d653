use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Owner;

/// A recorded OTT subscription period belonging to one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Store-assigned identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Free-text service label, trimmed (e.g., "Netflix")
    pub service_name: String,
    /// Last calendar day of the paid period
    pub expiry_date: NaiveDate,
    /// Free-text plan description, empty when not given
    pub plan: String,
    pub created_at: DateTime<Utc>,
}

/// A validated subscription that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub service_name: String,
    pub expiry_date: NaiveDate,
    pub plan: String,
}

impl NewSubscription {
    /// Assigns an id and creation timestamp
    pub fn into_subscription(self) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            service_name: self.service_name,
            expiry_date: self.expiry_date,
            plan: self.plan,
            created_at: Utc::now(),
        }
    }
}

/// Body of a subscription create request; every field is optional so that
/// missing fields are reported individually
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub service_name: Option<String>,
    pub expiry_date: Option<String>,
    pub plan: Option<String>,
}

/// Subscription joined with the owner fields the reminder sweep needs
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionWithOwner {
    pub subscription: Subscription,
    pub owner: Owner,
}

/// Normalized key used when comparing service names for overlap
pub fn service_key(service_name: &str) -> String {
    service_name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_key_trims_and_lowercases() {
        assert_eq!(service_key("  Netflix "), "netflix");
        assert_eq!(service_key("PRIME Video"), "prime video");
    }

    #[test]
    fn test_service_key_lowercases_non_ascii() {
        assert_eq!(service_key("ÉTOILE"), service_key("étoile "));
    }

    #[test]
    fn test_subscription_serializes_camel_case() {
        let sub = NewSubscription {
            user_id: Uuid::new_v4(),
            service_name: "Netflix".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            plan: String::new(),
        }
        .into_subscription();

        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["serviceName"], "Netflix");
        assert_eq!(json["expiryDate"], "2025-01-10");
        assert_eq!(json["plan"], "");
        assert!(json.get("userId").is_some());
    }

    #[test]
    fn test_create_request_allows_missing_fields() {
        let req: CreateSubscriptionRequest =
            serde_json::from_str(r#"{"serviceName": "Hulu"}"#).unwrap();
        assert_eq!(req.service_name.as_deref(), Some("Hulu"));
        assert!(req.expiry_date.is_none());
        assert!(req.plan.is_none());
    }
}
