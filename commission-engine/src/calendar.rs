//! Business-day counting for pace projections.
//!
//! Weekends are Saturday and Sunday. Public holidays are not modeled.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::types::MonthKey;

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekdays left in `month` counting `today` itself.
///
/// Past months have none left. Future months count from their 1st.
pub fn remaining_business_days(month: MonthKey, today: NaiveDate) -> u32 {
    let current = MonthKey::of(today);
    if month < current {
        return 0;
    }

    let start = if month == current {
        today
    } else {
        month.first_day()
    };

    business_days_between(start, month.last_day())
}

/// Weekdays in `[start, end]`, 0 when `start > end`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .count() as u32
}
