//! Calendar-day normalization.
//!
//! Streak continuity and the daily XP ledger both compare instants by
//! calendar day on a single reference calendar (UTC). Every day comparison
//! in the crate goes through `day_key` so the two ledgers can never
//! disagree about where a day boundary falls.

use chrono::{DateTime, NaiveDate, Utc};

/// Normalizes an instant to its UTC calendar day.
pub fn day_key(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// The current UTC calendar day.
pub fn today() -> NaiveDate {
    day_key(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_day_key_strips_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(day_key(morning), day_key(night));
    }

    #[test]
    fn test_day_key_midnight_boundary() {
        let before = Utc.with_ymd_and_hms(2026, 3, 14, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
        assert_ne!(day_key(before), day_key(after));
    }

    proptest! {
        /// Two instants map to the same key iff their UTC dates agree,
        /// regardless of time of day.
        #[test]
        fn prop_day_key_ignores_time(secs_a in 0u32..86_400, secs_b in 0u32..86_400, days in 0i64..20_000) {
            let base = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(days);
            let a = base + chrono::Duration::seconds(secs_a as i64);
            let b = base + chrono::Duration::seconds(secs_b as i64);
            prop_assert_eq!(day_key(a), day_key(b));
        }
    }
}
