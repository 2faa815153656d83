//! Trip schedule resolution.
//!
//! Trips are listed with a month name and a day or day range ("March",
//! "20-22"). This module turns that into concrete calendar dates for the
//! configured event year and decides whether the live forecast reaches them.

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Map a full English month name to 1-12. Exact match only.
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

/// Schedule parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Unknown month: {0:?}")]
    UnknownMonth(String),

    #[error("Trip dates are empty")]
    EmptyDates,

    #[error("Invalid day {0:?} in trip dates")]
    InvalidDay(String),

    #[error("Trip dates {0:?} must be a day or a day range like \"20-22\"")]
    MalformedRange(String),

    #[error("Day {day} does not exist in {year}-{month:02}")]
    DayOutOfRange { year: i32, month: u32, day: u32 },

    #[error("Trip ends ({end}) before it starts ({start})")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("{date} has no counterpart in {year}")]
    NotInYear { date: NaiveDate, year: i32 },
}

/// Concrete first and last day of a trip, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EventWindow {
    /// Resolve `month` + `dates` against `year`.
    pub fn resolve(month: &str, dates: &str, year: i32) -> Result<Self, DateError> {
        let month_num =
            month_number(month.trim()).ok_or_else(|| DateError::UnknownMonth(month.to_string()))?;

        let dates = dates.trim();
        if dates.is_empty() {
            return Err(DateError::EmptyDates);
        }

        let parts: Vec<&str> = dates.split('-').map(str::trim).collect();
        let (start_day, end_day) = match parts.as_slice() {
            [single] => {
                let day = parse_day(single)?;
                (day, day)
            }
            [first, last] => (parse_day(first)?, parse_day(last)?),
            _ => return Err(DateError::MalformedRange(dates.to_string())),
        };

        let start = calendar_date(year, month_num, start_day)?;
        let end = calendar_date(year, month_num, end_day)?;

        if end < start {
            return Err(DateError::EndBeforeStart { start, end });
        }

        Ok(Self { start, end })
    }

    /// Number of days covered, counting both ends
    pub fn day_count(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every date in the window, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.day_count())
    }

    /// Date at `offset` days after the start
    pub fn date_at(&self, offset: usize) -> Option<NaiveDate> {
        self.start.checked_add_days(Days::new(offset as u64))
    }

    /// Same month/day range moved to another year.
    ///
    /// Fails when the window contains Feb 29 and `year` is not a leap year.
    pub fn with_year(&self, year: i32) -> Result<Self, DateError> {
        let move_date = |date: NaiveDate| {
            date.with_year(year)
                .ok_or(DateError::NotInYear { date, year })
        };

        Ok(Self {
            start: move_date(self.start)?,
            end: move_date(self.end)?,
        })
    }

    /// `YYYY-MM-DD` of the first day
    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DD` of the last day
    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

fn parse_day(raw: &str) -> Result<u32, DateError> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(DateError::InvalidDay(raw.to_string()));
    }
    raw.parse().map_err(|_| DateError::InvalidDay(raw.to_string()))
}

fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::DayOutOfRange { year, month, day })
}

/// Source of "now" for forecast eligibility
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Midnight at the start of `date`
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Days around "now" for which the live forecast is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastRange {
    /// Trips that started up to this many days ago still use the forecast
    pub past_days: i64,
    /// Trips starting up to this many days ahead use the forecast
    pub horizon_days: i64,
}

impl Default for ForecastRange {
    fn default() -> Self {
        Self {
            past_days: 3,
            horizon_days: 16,
        }
    }
}

impl ForecastRange {
    /// Fractional days from `now` until local midnight of `start`
    pub fn days_until(start: NaiveDate, now: NaiveDateTime) -> f64 {
        let start = start.and_time(NaiveTime::MIN);
        (start - now).num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    /// Both bounds inclusive
    pub fn contains(&self, start: NaiveDate, now: NaiveDateTime) -> bool {
        let diff = Self::days_until(start, now);
        diff >= -(self.past_days as f64) && diff <= self.horizon_days as f64
    }
}
