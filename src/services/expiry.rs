//! Day-granularity expiry arithmetic.
//!
//! Every input is reduced to its calendar date before subtracting, so the
//! result does not depend on the time of day the computation runs at.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Anything that falls on a single calendar day
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// The local date in the value's own timezone
impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Whole calendar days from `now` until `expiry`.
///
/// Zero when both fall on the same day, negative once expired.
pub fn days_remaining(now: impl CalendarDay, expiry: impl CalendarDay) -> i64 {
    (expiry.calendar_day() - now.calendar_day()).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime, Utc};
    use chrono_tz::Asia::Kolkata;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, h: u32, min: u32) -> NaiveDateTime {
        day.and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    #[test]
    fn test_same_day_is_zero_regardless_of_time() {
        let day = date(2025, 1, 10);
        assert_eq!(days_remaining(at(day, 0, 1), at(day, 23, 59)), 0);
        assert_eq!(days_remaining(at(day, 23, 59), at(day, 0, 1)), 0);
        assert_eq!(days_remaining(day, day), 0);
    }

    #[test]
    fn test_late_and_early_runs_agree() {
        let expiry = date(2025, 1, 13);
        let today = date(2025, 1, 10);
        assert_eq!(days_remaining(at(today, 0, 1), expiry), 3);
        assert_eq!(days_remaining(at(today, 23, 59), expiry), 3);
    }

    #[test]
    fn test_decreases_by_one_per_day() {
        let expiry = date(2025, 3, 1);
        let start = date(2025, 2, 20);
        let mut previous = days_remaining(start, expiry);
        for offset in 1..15 {
            let now = start + Duration::days(offset);
            let current = days_remaining(now, expiry);
            assert_eq!(current, previous - 1);
            previous = current;
        }
        assert!(previous < 0);
    }

    #[test]
    fn test_spans_month_and_leap_day() {
        assert_eq!(days_remaining(date(2024, 2, 28), date(2024, 3, 1)), 2);
        assert_eq!(days_remaining(date(2025, 12, 31), date(2026, 1, 1)), 1);
    }

    #[test]
    fn test_zoned_datetime_uses_local_date() {
        // 20:00 UTC on Jan 9 is already Jan 10 in Kolkata
        let utc = Utc.with_ymd_and_hms(2025, 1, 9, 20, 0, 0).unwrap();
        let local = utc.with_timezone(&Kolkata);
        assert_eq!(days_remaining(utc, date(2025, 1, 10)), 1);
        assert_eq!(days_remaining(local, date(2025, 1, 10)), 0);
    }
}
