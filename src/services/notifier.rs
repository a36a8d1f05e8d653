use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::{plural_days, Owner, Reminder},
};

/// A single outbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery channel for reminder notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification; failures are reported as `AppError::Dispatch`
    async fn send(&self, notification: &Notification) -> AppResult<()>;
}

/// Builds the reminder email for a subscription owner
pub fn reminder_notification(owner: &Owner, reminder: &Reminder) -> Notification {
    let name = if owner.name.trim().is_empty() {
        "User"
    } else {
        owner.name.as_str()
    };
    let service = &reminder.service_name;
    let expiry = reminder.expiry_date.format("%a %b %d %Y");

    let (subject, body) = if reminder.days_left == 0 {
        (
            format!("{service} expires today!"),
            format!(
                "Hi {name},\n\nYour {service} subscription expires TODAY ({expiry}).\n\n\
                 Don't forget to renew!\n\n- OTTSub Team"
            ),
        )
    } else {
        let days = plural_days(reminder.days_left);
        (
            format!("{service} expires in {days}"),
            format!(
                "Hi {name},\n\nYour {service} subscription expires on {expiry} (in {days}).\n\n\
                 Time to consider renewal!\n\n- OTTSub Team"
            ),
        )
    };

    Notification {
        to: owner.email.clone(),
        subject,
        body,
    }
}

/// Sends mail through an HTTP transactional mail API
#[derive(Clone)]
pub struct HttpMailNotifier {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailNotifier {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    async fn send(&self, notification: &Notification) -> AppResult<()> {
        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": self.from,
                "to": notification.to,
                "subject": notification.subject,
                "text": notification.body,
            }))
            .send()
            .await
            .map_err(|e| AppError::Dispatch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Dispatch(format!(
                "Mail API returned status {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn owner(name: &str) -> Owner {
        Owner {
            name: name.to_string(),
            email: "asha@example.com".to_string(),
            reminders_enabled: true,
        }
    }

    fn reminder(days_left: i64) -> Reminder {
        Reminder {
            subscription_id: Uuid::new_v4(),
            service_name: "Netflix".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            plan: String::new(),
            days_left,
            message: crate::models::expiry_message(days_left),
        }
    }

    #[test]
    fn test_notification_for_days_ahead() {
        let n = reminder_notification(&owner("Asha"), &reminder(3));
        assert_eq!(n.to, "asha@example.com");
        assert_eq!(n.subject, "Netflix expires in 3 days");
        assert!(n.body.starts_with("Hi Asha,"));
        assert!(n.body.contains("expires on Fri Jan 10 2025 (in 3 days)"));
    }

    #[test]
    fn test_notification_singular_day() {
        let n = reminder_notification(&owner("Asha"), &reminder(1));
        assert_eq!(n.subject, "Netflix expires in 1 day");
        assert!(n.body.contains("(in 1 day)"));
    }

    #[test]
    fn test_notification_today_and_fallback_name() {
        let n = reminder_notification(&owner(""), &reminder(0));
        assert_eq!(n.subject, "Netflix expires today!");
        assert!(n.body.starts_with("Hi User,"));
        assert!(n.body.contains("expires TODAY (Fri Jan 10 2025)"));
    }
}
