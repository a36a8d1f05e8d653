//! Validation of new subscriptions against a user's existing periods.
//!
//! A subscription has no start date; the latest recorded expiry for the same
//! user and service is the implicit start of the next period, so a new record
//! must expire strictly after it.

use chrono::{DateTime, NaiveDate};
use uuid::Uuid;

use crate::{
    db::SubscriptionStore,
    error::{AppError, AppResult},
    models::{CreateSubscriptionRequest, NewSubscription, Subscription},
};

/// Parses an expiry given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// For timestamps the calendar date as written (in its own offset) is used.
pub fn parse_expiry_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::InvalidDate("Invalid expiry date".to_string()))
}

/// Rejects `new` when `latest` expires on or after it
pub fn check_overlap(latest: Option<&Subscription>, new: &NewSubscription) -> AppResult<()> {
    match latest {
        Some(latest) if new.expiry_date <= latest.expiry_date => {
            Err(AppError::OverlappingPeriod {
                service_name: new.service_name.clone(),
                until: latest.expiry_date,
            })
        }
        _ => Ok(()),
    }
}

/// Checks required fields, parses the expiry date and compares it with the
/// user's most recent record for the same service.
///
/// Past dates are accepted when nothing conflicts, so expired periods can be
/// recorded for history.
pub async fn validate_new_subscription(
    store: &dyn SubscriptionStore,
    user_id: Uuid,
    request: CreateSubscriptionRequest,
) -> AppResult<NewSubscription> {
    let service_name = request
        .service_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Service name required".to_string()))?
        .to_string();

    let expiry_raw = request
        .expiry_date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Expiry date required".to_string()))?;
    let expiry_date = parse_expiry_date(expiry_raw)?;

    let new = NewSubscription {
        user_id,
        service_name,
        expiry_date,
        plan: request.plan.unwrap_or_default(),
    };

    let latest = store.latest_for_service(user_id, &new.service_name).await?;
    check_overlap(latest.as_ref(), &new)?;

    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(service: &str, expiry: &str) -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            service_name: Some(service.to_string()),
            expiry_date: Some(expiry.to_string()),
            plan: None,
        }
    }

    #[test]
    fn test_parse_expiry_date_formats() {
        assert_eq!(parse_expiry_date("2025-01-10").unwrap(), date(2025, 1, 10));
        assert_eq!(
            parse_expiry_date("2025-01-10T23:30:00+05:30").unwrap(),
            date(2025, 1, 10)
        );
        assert_eq!(
            parse_expiry_date("2025-01-10T00:00:00.000Z").unwrap(),
            date(2025, 1, 10)
        );
    }

    #[test]
    fn test_parse_expiry_date_rejects_garbage() {
        for raw in ["tomorrow", "2025-02-30", "10/01/2025", ""] {
            assert!(matches!(
                parse_expiry_date(raw),
                Err(AppError::InvalidDate(_))
            ));
        }
    }

    #[test]
    fn test_check_overlap_boundary() {
        let user_id = Uuid::new_v4();
        let latest = NewSubscription {
            user_id,
            service_name: "Netflix".to_string(),
            expiry_date: date(2025, 1, 10),
            plan: String::new(),
        }
        .into_subscription();

        let mut new = NewSubscription {
            user_id,
            service_name: "Netflix".to_string(),
            expiry_date: date(2025, 1, 10),
            plan: String::new(),
        };
        assert!(check_overlap(Some(&latest), &new).is_err());

        new.expiry_date = date(2025, 1, 11);
        assert!(check_overlap(Some(&latest), &new).is_ok());
        assert!(check_overlap(None, &new).is_ok());
    }

    #[tokio::test]
    async fn test_validate_rejects_earlier_expiry_with_conflicting_date() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let first = validate_new_subscription(&store, user_id, request("Netflix", "2025-01-10"))
            .await
            .unwrap();
        store.insert_if_no_overlap(first).await.unwrap();

        let err = validate_new_subscription(&store, user_id, request("Netflix", "2025-01-05"))
            .await
            .unwrap_err();
        match err {
            AppError::OverlappingPeriod { until, .. } => {
                assert_eq!(until.format("%Y-%m-%d").to_string(), "2025-01-10")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validate_trims_and_defaults_plan() {
        let store = MemoryStore::new();
        let new = validate_new_subscription(
            &store,
            Uuid::new_v4(),
            request("  Prime Video  ", "2020-06-01"),
        )
        .await
        .unwrap();
        assert_eq!(new.service_name, "Prime Video");
        assert_eq!(new.plan, "");
        assert_eq!(new.expiry_date, date(2020, 6, 1));
    }

    #[tokio::test]
    async fn test_validate_reports_missing_fields() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let err = validate_new_subscription(
            &store,
            user_id,
            CreateSubscriptionRequest {
                expiry_date: Some("2025-01-10".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Service name required");

        let err = validate_new_subscription(
            &store,
            user_id,
            CreateSubscriptionRequest {
                service_name: Some("Hulu".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Expiry date required");

        let err = validate_new_subscription(&store, user_id, request("Hulu", "soon"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid expiry date");
    }

    #[tokio::test]
    async fn test_other_services_and_users_do_not_conflict() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let first = validate_new_subscription(&store, user_id, request("Netflix", "2025-01-10"))
            .await
            .unwrap();
        store.insert_if_no_overlap(first).await.unwrap();

        assert!(
            validate_new_subscription(&store, user_id, request("Hulu", "2025-01-05"))
                .await
                .is_ok()
        );
        assert!(validate_new_subscription(
            &store,
            Uuid::new_v4(),
            request("Netflix", "2025-01-05")
        )
        .await
        .is_ok());
    }
}
