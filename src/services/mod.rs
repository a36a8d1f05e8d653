pub mod auth;
pub mod expiry;
pub mod movies;
pub mod notifier;
pub mod overlap;
pub mod reminders;
pub mod subscriptions;
pub mod sweep;
