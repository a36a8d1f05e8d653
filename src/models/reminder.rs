use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// An upcoming-expiry reminder derived from a subscription; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub subscription_id: Uuid,
    pub service_name: String,
    pub expiry_date: NaiveDate,
    pub plan: String,
    pub days_left: i64,
    pub message: String,
}

/// Exact days-remaining values that trigger a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDays(BTreeSet<i64>);

impl TargetDays {
    pub fn new(days: impl IntoIterator<Item = i64>) -> Self {
        Self(days.into_iter().collect())
    }

    /// Fixed set used by the dashboard query
    pub fn dashboard() -> Self {
        Self::new([1, 3])
    }

    /// Parses a comma-separated list such as `"3,1"`.
    ///
    /// Entries that are not positive integers are dropped; the result may be empty.
    pub fn parse(raw: &str) -> Self {
        Self::new(
            raw.split(',')
                .filter_map(|part| part.trim().parse::<i64>().ok())
                .filter(|days| *days > 0),
        )
    }

    pub fn contains(&self, days: i64) -> bool {
        self.0.contains(&days)
    }

    pub fn max(&self) -> Option<i64> {
        self.0.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

/// "1 day", "3 days"
pub fn plural_days(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Human-readable reminder text for a days-remaining value
pub fn expiry_message(days_left: i64) -> String {
    if days_left == 0 {
        "Expires today!".to_string()
    } else {
        format!("Expires in {}", plural_days(days_left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_days() {
        let days = TargetDays::parse("3,1");
        assert!(days.contains(1));
        assert!(days.contains(3));
        assert!(!days.contains(2));
        assert_eq!(days.max(), Some(3));
    }

    #[test]
    fn test_parse_target_days_drops_invalid_entries() {
        let days = TargetDays::parse(" 7 , abc, 0, -2,,14 ");
        assert_eq!(days.iter().collect::<Vec<_>>(), vec![7, 14]);
    }

    #[test]
    fn test_parse_target_days_empty() {
        assert!(TargetDays::parse("").is_empty());
        assert!(TargetDays::parse("x,y").is_empty());
        assert_eq!(TargetDays::parse("").max(), None);
    }

    #[test]
    fn test_dashboard_target_days() {
        assert_eq!(TargetDays::dashboard(), TargetDays::new([3, 1]));
    }

    #[test]
    fn test_expiry_message() {
        assert_eq!(expiry_message(0), "Expires today!");
        assert_eq!(expiry_message(1), "Expires in 1 day");
        assert_eq!(expiry_message(3), "Expires in 3 days");
    }
}
