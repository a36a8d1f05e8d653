//! Daily reminder sweep.
//!
//! Once a day, at a fixed wall-clock time in a fixed timezone, every
//! subscription whose days remaining lands exactly on a configured target day
//! gets one notification sent to its owner. Nothing records that a reminder
//! was sent: each target day is hit on exactly one calendar day, so running at
//! most once per day is what keeps sends unique.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    config::Config,
    db::SubscriptionStore,
    error::{AppError, AppResult},
    models::{Owner, Subscription, TargetDays},
    services::{
        notifier::{reminder_notification, Notifier},
        reminders::{reminder_window, select_reminders},
    },
};

/// When the sweep runs and what it looks for
#[derive(Debug, Clone)]
pub struct ReminderSchedule {
    pub target_days: TargetDays,
    /// Local time of day the sweep fires at
    pub trigger_time: NaiveTime,
    pub timezone: Tz,
    /// Upper bound on one notification dispatch
    pub dispatch_timeout: Duration,
}

impl ReminderSchedule {
    /// Builds the schedule from configuration.
    ///
    /// An empty target-day list is allowed here; the caller decides whether to
    /// start a sweep that would never send anything.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let trigger_time = NaiveTime::parse_from_str(config.reminder_time.trim(), "%H:%M")
            .map_err(|_| {
                AppError::InvalidInput(format!(
                    "Invalid REMINDER_TIME {:?}, expected HH:MM",
                    config.reminder_time
                ))
            })?;

        Ok(Self {
            target_days: TargetDays::parse(&config.expiry_reminder_days),
            trigger_time,
            timezone: parse_timezone(&config.reminder_timezone)?,
            dispatch_timeout: Duration::from_secs(config.dispatch_timeout_secs),
        })
    }

    /// The first trigger instant strictly after `now`
    pub fn next_trigger(&self, now: DateTime<Tz>) -> DateTime<Tz> {
        let mut day = now.with_timezone(&self.timezone).date_naive();
        loop {
            // Skips days where the trigger time falls into a DST gap
            if let Some(candidate) = self
                .timezone
                .from_local_datetime(&day.and_time(self.trigger_time))
                .earliest()
            {
                if candidate > now {
                    return candidate;
                }
            }
            day = day + Days::new(1);
        }
    }
}

/// Parses an IANA timezone name such as `Asia/Kolkata`
pub fn parse_timezone(raw: &str) -> AppResult<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|_| AppError::InvalidInput(format!("Unknown timezone {:?}", raw)))
}

/// Counters for one completed sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Subscriptions loaded from the pre-filter window
    pub candidates: usize,
    pub sent: usize,
    /// Candidates whose owner has reminders turned off
    pub skipped_disabled: usize,
    /// Dispatches that errored or timed out
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Completed(SweepReport),
    /// A previous sweep was still in progress
    AlreadyRunning,
    /// A sweep already completed for this local calendar day
    AlreadyRanToday,
    /// Loading candidates failed; nothing was sent
    Failed(String),
}

/// Clears the running flag when a sweep ends, however it ends
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ReminderSweep {
    store: Arc<dyn SubscriptionStore>,
    notifier: Arc<dyn Notifier>,
    schedule: ReminderSchedule,
    running: AtomicBool,
    last_run: Mutex<Option<NaiveDate>>,
}

impl ReminderSweep {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        notifier: Arc<dyn Notifier>,
        schedule: ReminderSchedule,
    ) -> Self {
        Self {
            store,
            notifier,
            schedule,
            running: AtomicBool::new(false),
            last_run: Mutex::new(None),
        }
    }

    pub fn schedule(&self) -> &ReminderSchedule {
        &self.schedule
    }

    /// Runs one sweep for the local day of `now`, unless one is already
    /// running or has already completed for that day.
    pub async fn tick(&self, now: DateTime<Tz>) -> TickOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Previous reminder sweep still running, skipping this tick");
            return TickOutcome::AlreadyRunning;
        }
        let _running = RunningGuard(&self.running);

        let today = now.with_timezone(&self.schedule.timezone).date_naive();
        if *self.last_run.lock().unwrap_or_else(PoisonError::into_inner) == Some(today) {
            tracing::warn!(%today, "Reminder sweep already ran today, skipping this tick");
            return TickOutcome::AlreadyRanToday;
        }

        tracing::info!(
            local_time = %now.with_timezone(&self.schedule.timezone).format("%Y-%m-%d %H:%M:%S %Z"),
            "Running reminder sweep"
        );

        match self.run(today).await {
            Ok(report) => {
                *self.last_run.lock().unwrap_or_else(PoisonError::into_inner) = Some(today);
                tracing::info!(
                    candidates = report.candidates,
                    sent = report.sent,
                    skipped_disabled = report.skipped_disabled,
                    failed = report.failed,
                    "Reminder sweep complete"
                );
                TickOutcome::Completed(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "Reminder sweep failed");
                TickOutcome::Failed(e.to_string())
            }
        }
    }

    /// Evaluates every candidate for `today` and dispatches reminders.
    ///
    /// A failed or timed-out dispatch is counted and logged; the remaining
    /// subscriptions are still processed and nothing is retried.
    async fn run(&self, today: NaiveDate) -> AppResult<SweepReport> {
        let target_days = &self.schedule.target_days;
        let Some((from, to)) = reminder_window(today, target_days) else {
            return Ok(SweepReport::default());
        };

        let candidates = self.store.expiring_with_owners(from, to).await?;
        let mut report = SweepReport {
            candidates: candidates.len(),
            ..Default::default()
        };
        tracing::info!(candidates = report.candidates, %from, %to, "Loaded reminder candidates");

        let mut owners: HashMap<Uuid, Owner> = HashMap::new();
        let mut eligible: Vec<Subscription> = Vec::new();
        for row in candidates {
            if !row.owner.reminders_enabled {
                tracing::debug!(
                    subscription_id = %row.subscription.id,
                    email = %row.owner.email,
                    "Skipping subscription, reminders disabled"
                );
                report.skipped_disabled += 1;
                continue;
            }
            owners.insert(row.subscription.id, row.owner);
            eligible.push(row.subscription);
        }

        for reminder in select_reminders(&eligible, today, target_days) {
            let Some(owner) = owners.get(&reminder.subscription_id) else {
                continue;
            };
            let notification = reminder_notification(owner, &reminder);

            let outcome =
                match tokio::time::timeout(self.schedule.dispatch_timeout, self.notifier.send(&notification))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(AppError::Dispatch(format!(
                        "timed out after {:?}",
                        self.schedule.dispatch_timeout
                    ))),
                };

            match outcome {
                Ok(()) => {
                    report.sent += 1;
                    tracing::info!(
                        email = %owner.email,
                        service = %reminder.service_name,
                        days_left = reminder.days_left,
                        "Reminder sent"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        error = %e,
                        email = %owner.email,
                        service = %reminder.service_name,
                        "Failed to send reminder"
                    );
                }
            }
        }

        Ok(report)
    }

    /// Spawns the scheduler loop: sleep until the next trigger, start a tick,
    /// repeat. Each tick runs in its own task; one that arrives while another
    /// is still running is skipped.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                target_days = ?self.schedule.target_days.iter().collect::<Vec<_>>(),
                trigger_time = %self.schedule.trigger_time,
                timezone = %self.schedule.timezone,
                "Reminder sweep scheduled"
            );

            loop {
                let now = Utc::now().with_timezone(&self.schedule.timezone);
                let next = self.schedule.next_trigger(now);
                let wait = (next - now).to_std().unwrap_or_default();
                tracing::debug!(next = %next, wait_secs = wait.as_secs(), "Waiting for next reminder sweep");
                tokio::time::sleep(wait).await;

                let sweep = Arc::clone(&self);
                tokio::spawn(async move {
                    let now = Utc::now().with_timezone(&sweep.schedule.timezone);
                    sweep.tick(now).await;
                });
            }
        })
    }
}
