use chrono::{DateTime, Days, NaiveDate};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::{
    db::SubscriptionStore,
    error::AppResult,
    models::{expiry_message, Reminder, Subscription, TargetDays},
    services::expiry::{days_remaining, CalendarDay},
};

/// Date range worth loading for a set of target days: `[today, today + max + 1]`.
///
/// Only narrows the query; membership in the target set decides what is reminded.
/// `None` when there are no target days.
pub fn reminder_window(today: NaiveDate, target_days: &TargetDays) -> Option<(NaiveDate, NaiveDate)> {
    let max = u64::try_from(target_days.max()?).ok()?;
    let end = today.checked_add_days(Days::new(max + 1))?;
    Some((today, end))
}

/// Builds reminders for the subscriptions whose days remaining is exactly one
/// of `target_days`, ascending by expiry with ties in input order.
pub fn select_reminders(
    subscriptions: &[Subscription],
    now: impl CalendarDay,
    target_days: &TargetDays,
) -> Vec<Reminder> {
    let today = now.calendar_day();

    let mut reminders: Vec<Reminder> = subscriptions
        .iter()
        .filter_map(|sub| {
            let days_left = days_remaining(today, sub.expiry_date);
            target_days.contains(days_left).then(|| Reminder {
                subscription_id: sub.id,
                service_name: sub.service_name.clone(),
                expiry_date: sub.expiry_date,
                plan: sub.plan.clone(),
                days_left,
                message: expiry_message(days_left),
            })
        })
        .collect();

    reminders.sort_by_key(|r| r.expiry_date);
    reminders
}

/// Dashboard reminders for one user, using the fixed dashboard target days
#[tracing::instrument(skip(store))]
pub async fn get_reminders(
    store: &dyn SubscriptionStore,
    user_id: Uuid,
    now: DateTime<Tz>,
) -> AppResult<Vec<Reminder>> {
    let target_days = TargetDays::dashboard();
    let today = now.calendar_day();
    let Some((from, to)) = reminder_window(today, &target_days) else {
        return Ok(Vec::new());
    };

    let candidates = store.expiring_for_user(user_id, from, to).await?;
    let reminders = select_reminders(&candidates, today, &target_days);

    tracing::debug!(
        candidates = candidates.len(),
        reminders = reminders.len(),
        "Dashboard reminders computed"
    );

    Ok(reminders)
}
