pub mod movie;
pub mod reminder;
pub mod subscription;
pub mod user;

pub use movie::{Movie, MovieResult, OmdbMovieDetails, OmdbSearchHit, OmdbSearchResponse};
pub use reminder::{expiry_message, plural_days, Reminder, TargetDays};
pub use subscription::{
    service_key, CreateSubscriptionRequest, NewSubscription, Subscription, SubscriptionWithOwner,
};
pub use user::{Owner, ReminderPreference, User};
