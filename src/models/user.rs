use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user as seen by this service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub reminders_enabled: bool,
}

impl User {
    /// Creates a user with reminders enabled
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            reminders_enabled: true,
        }
    }

    pub fn owner(&self) -> Owner {
        Owner {
            name: self.name.clone(),
            email: self.email.clone(),
            reminders_enabled: self.reminders_enabled,
        }
    }
}

/// Owner fields attached to a subscription for the reminder sweep
#[derive(Debug, Clone, PartialEq)]
pub struct Owner {
    pub name: String,
    pub email: String,
    pub reminders_enabled: bool,
}

/// Email reminder opt-in, as exchanged with clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPreference {
    pub reminders_enabled: bool,
}
