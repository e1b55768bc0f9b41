//! Reporting periods and the interval calculator
//!
//! A period is either a calendar month or a 7/14 day window that always ends
//! on a Sunday. Every function takes "today" explicitly so results are
//! reproducible.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExpenseError, ExpenseResult};

/// The interval a report or budget plan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Calendar month
    Month,
    /// Fourteen days ending on a Sunday
    BiWeek,
    /// Seven days ending on a Sunday
    Week,
}

impl PeriodType {
    /// All period types in reporting order
    pub const ALL: [PeriodType; 3] = [PeriodType::Month, PeriodType::BiWeek, PeriodType::Week];

    /// Length in days for fixed-length periods; `None` for months
    pub const fn length_days(&self) -> Option<i64> {
        match self {
            Self::Month => None,
            Self::BiWeek => Some(14),
            Self::Week => Some(7),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::BiWeek => "bi_week",
            Self::Week => "week",
        }
    }
}

impl Default for PeriodType {
    fn default() -> Self {
        Self::Month
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" => Ok(Self::Month),
            "bi_week" | "bi-week" | "biweek" | "biweekly" => Ok(Self::BiWeek),
            "week" | "weekly" => Ok(Self::Week),
            _ => Err(PeriodParseError::UnknownPeriodType(s.to_string())),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    UnknownPeriodType(String),
    InvalidDate(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPeriodType(s) => write!(
                f,
                "Unknown period type '{}' (expected month, bi_week or week)",
                s
            ),
            Self::InvalidDate(s) => write!(f, "Invalid date '{}' (expected YYYY-MM-DD)", s),
        }
    }
}

impl std::error::Error for PeriodParseError {}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, PeriodParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PeriodParseError::InvalidDate(s.to_string()))
}

/// An inclusive date range with `first_date <= last_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    first_date: NaiveDate,
    last_date: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `first > last`
    pub fn new(first_date: NaiveDate, last_date: NaiveDate) -> ExpenseResult<Self> {
        if first_date > last_date {
            return Err(ExpenseError::InvalidRange {
                first: first_date,
                last: last_date,
            });
        }
        Ok(Self {
            first_date,
            last_date,
        })
    }

    /// A single-day range
    pub fn day(date: NaiveDate) -> Self {
        Self {
            first_date: date,
            last_date: date,
        }
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_date && date <= self.last_date
    }

    /// Number of calendar days covered, counting both ends
    pub fn len_days(&self) -> i64 {
        (self.last_date - self.first_date).num_days() + 1
    }

    /// Every calendar day in the range, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_date;
        self.first_date.iter_days().take_while(move |d| *d <= last)
    }

    /// Shift both ends back by a number of days
    fn shifted_back(&self, days: i64) -> Self {
        Self {
            first_date: self.first_date - Duration::days(days),
            last_date: self.last_date - Duration::days(days),
        }
    }

    /// True when this range is exactly one calendar month
    pub fn is_calendar_month(&self) -> bool {
        self.first_date.day() == 1 && self.last_date == last_of_month(self.first_date)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.first_date, self.last_date)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a calendar month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Day 1 of the date's month
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Last calendar day of the date's month
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let days = days_in_month(date.year(), date.month());
    first_of_month(date) + Duration::days(i64::from(days) - 1)
}

fn previous_calendar_month(date: NaiveDate) -> DateRange {
    let last = first_of_month(date) - Duration::days(1);
    DateRange {
        first_date: first_of_month(last),
        last_date: last,
    }
}

/// The period containing `today`, or `explicit` unchanged when given
///
/// Weeks and bi-weeks end on the upcoming Sunday (today when today is Sunday).
pub fn current_period(
    period_type: PeriodType,
    today: NaiveDate,
    explicit: Option<DateRange>,
) -> DateRange {
    if let Some(range) = explicit {
        return range;
    }

    match period_type.length_days() {
        None => DateRange {
            first_date: first_of_month(today),
            last_date: last_of_month(today),
        },
        Some(length) => {
            let until_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
            let last_date = today + Duration::days(until_sunday);
            DateRange {
                first_date: last_date - Duration::days(length - 1),
                last_date,
            }
        }
    }
}

/// The period immediately before `current`
///
/// Months shift the first date back by the length of the preceding month and
/// the last date back by the length of the first date's month, which lands on
/// the previous calendar month. A range that is not a calendar month cannot be
/// shifted that way without risking `first > last`, so it resolves to the
/// calendar month before its first date.
pub fn previous_period(period_type: PeriodType, current: &DateRange) -> DateRange {
    match period_type.length_days() {
        Some(length) => current.shifted_back(length),
        None if current.is_calendar_month() => {
            let first = current.first_date;
            let prior = previous_calendar_month(first);
            let prior_len = days_in_month(prior.first_date.year(), prior.first_date.month());
            let own_len = days_in_month(first.year(), first.month());
            DateRange {
                first_date: first - Duration::days(i64::from(prior_len)),
                last_date: current.last_date - Duration::days(i64::from(own_len)),
            }
        }
        None => {
            tracing::warn!(
                range = %current,
                "month range is not a calendar month; using the month before its first date"
            );
            previous_calendar_month(current.first_date)
        }
    }
}

/// The `count` most recent periods, most recent first
pub fn latest_periods(period_type: PeriodType, today: NaiveDate, count: usize) -> Vec<DateRange> {
    let mut periods = Vec::with_capacity(count);
    let mut range = current_period(period_type, today, None);

    for _ in 0..count {
        periods.push(range);
        range = previous_period(period_type, &range);
    }

    periods
}

/// Day 1 of today's month through today
pub fn month_to_date(today: NaiveDate) -> DateRange {
    DateRange {
        first_date: first_of_month(today),
        last_date: today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(first: NaiveDate, last: NaiveDate) -> DateRange {
        DateRange::new(first, last).unwrap()
    }

    #[test]
    fn test_invalid_range_rejected() {
        let err = DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidRange { .. }));
        assert!(DateRange::new(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_current_month() {
        let r = current_period(PeriodType::Month, date(2024, 2, 14), None);
        assert_eq!(r.first_date(), date(2024, 2, 1));
        assert_eq!(r.last_date(), date(2024, 2, 29));
    }

    #[test]
    fn test_explicit_range_returned_unchanged() {
        let explicit = range(date(2024, 1, 5), date(2024, 1, 9));
        let r = current_period(PeriodType::Week, date(2024, 6, 1), Some(explicit));
        assert_eq!(r, explicit);
    }

    #[test]
    fn test_current_week_ends_on_sunday_for_every_weekday() {
        // 2024-03-04 is a Monday
        for offset in 0..7 {
            let today = date(2024, 3, 4) + Duration::days(offset);
            let r = current_period(PeriodType::Week, today, None);
            assert_eq!(r.last_date().weekday(), Weekday::Sun);
            assert_eq!(r.last_date(), date(2024, 3, 10));
            assert_eq!(r.len_days(), 7);
            assert!(r.contains(today));
        }
    }

    #[test]
    fn test_current_bi_week() {
        let r = current_period(PeriodType::BiWeek, date(2024, 3, 6), None);
        assert_eq!(r.first_date(), date(2024, 2, 26));
        assert_eq!(r.last_date(), date(2024, 3, 10));
        assert_eq!(r.len_days(), 14);
    }

    #[test]
    fn test_previous_month_leap_year() {
        let prev = previous_period(
            PeriodType::Month,
            &range(date(2024, 3, 1), date(2024, 3, 31)),
        );
        assert_eq!(prev, range(date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_previous_month_year_rollover() {
        let prev = previous_period(
            PeriodType::Month,
            &range(date(2024, 1, 1), date(2024, 1, 31)),
        );
        assert_eq!(prev, range(date(2023, 12, 1), date(2023, 12, 31)));
    }

    #[test]
    fn test_previous_month_of_short_month() {
        let prev = previous_period(
            PeriodType::Month,
            &range(date(2023, 2, 1), date(2023, 2, 28)),
        );
        assert_eq!(prev, range(date(2023, 1, 1), date(2023, 1, 31)));
    }

    #[test]
    fn test_previous_month_non_calendar_range() {
        let prev = previous_period(
            PeriodType::Month,
            &range(date(2024, 3, 31), date(2024, 3, 31)),
        );
        assert_eq!(prev, range(date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_previous_week_and_bi_week() {
        let week = range(date(2024, 3, 4), date(2024, 3, 10));
        assert_eq!(
            previous_period(PeriodType::Week, &week),
            range(date(2024, 2, 26), date(2024, 3, 3))
        );

        let bi_week = range(date(2024, 2, 26), date(2024, 3, 10));
        assert_eq!(
            previous_period(PeriodType::BiWeek, &bi_week),
            range(date(2024, 2, 12), date(2024, 2, 25))
        );
    }

    #[test]
    fn test_latest_periods_most_recent_first() {
        let periods = latest_periods(PeriodType::Month, date(2024, 2, 10), 3);
        assert_eq!(
            periods,
            vec![
                range(date(2024, 2, 1), date(2024, 2, 29)),
                range(date(2024, 1, 1), date(2024, 1, 31)),
                range(date(2023, 12, 1), date(2023, 12, 31)),
            ]
        );
        assert!(latest_periods(PeriodType::Week, date(2024, 2, 10), 0).is_empty());
    }

    #[test]
    fn test_days_iterator() {
        let r = range(date(2024, 2, 28), date(2024, 3, 1));
        let days: Vec<_> = r.days().collect();
        assert_eq!(days, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn test_month_to_date() {
        let r = month_to_date(date(2024, 5, 17));
        assert_eq!(r.first_date(), date(2024, 5, 1));
        assert_eq!(r.last_date(), date(2024, 5, 17));
    }

    #[test]
    fn test_period_type_parse_and_serde() {
        assert_eq!("bi-week".parse::<PeriodType>().unwrap(), PeriodType::BiWeek);
        assert_eq!("Monthly".parse::<PeriodType>().unwrap(), PeriodType::Month);
        assert!("daily".parse::<PeriodType>().is_err());
        assert_eq!(
            serde_json::to_string(&PeriodType::BiWeek).unwrap(),
            "\"bi_week\""
        );
    }
}
