use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::{
    db::{SubscriptionStore, UserStore},
    services::{auth::TokenVerifier, movies::MovieSearcher},
};

/// Shared handler state
pub struct AppState {
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub users: Arc<dyn UserStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Absent when no OMDb key is configured
    pub movies: Option<Arc<dyn MovieSearcher>>,
    /// Zone "today" is evaluated in for dashboard reminders
    pub timezone: Tz,
}

impl AppState {
    /// Current instant in the configured zone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }
}
