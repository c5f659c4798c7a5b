use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a repeating transaction recurs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RepeatCadence {
    #[default]
    Never,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatCadence {
    /// Returns the `index`-th occurrence counted from `origin` (index 0 is the
    /// origin itself). Monthly and yearly cadences clamp to the last day of a
    /// short month while always deriving from the origin's day-of-month, so a
    /// Jan 31 origin yields Feb 28 then Mar 31 rather than drifting.
    pub fn occurrence_date(&self, origin: NaiveDate, index: u32) -> NaiveDate {
        match self {
            RepeatCadence::Never => origin,
            RepeatCadence::Daily => origin + Duration::days(index as i64),
            RepeatCadence::Weekly => origin + Duration::weeks(index as i64),
            RepeatCadence::Monthly => shift_month(origin, index as i32),
            RepeatCadence::Yearly => shift_year(origin, index as i32),
        }
    }

    /// Smallest occurrence index whose date falls on or after `date`, computed
    /// directly instead of stepping from the origin.
    pub fn first_index_on_or_after(&self, origin: NaiveDate, date: NaiveDate) -> u32 {
        if date <= origin {
            return 0;
        }
        match self {
            RepeatCadence::Never => 0,
            RepeatCadence::Daily => (date - origin).num_days() as u32,
            RepeatCadence::Weekly => {
                let days = (date - origin).num_days();
                days.div_euclid(7) as u32 + if days.rem_euclid(7) == 0 { 0 } else { 1 }
            }
            RepeatCadence::Monthly => {
                let diff = month_index(date) - month_index(origin);
                let candidate = diff.max(0) as u32;
                if self.occurrence_date(origin, candidate) < date {
                    candidate + 1
                } else {
                    candidate
                }
            }
            RepeatCadence::Yearly => {
                let diff = date.year() - origin.year();
                let candidate = diff.max(0) as u32;
                if self.occurrence_date(origin, candidate) < date {
                    candidate + 1
                } else {
                    candidate
                }
            }
        }
    }

    pub fn is_repeating(&self) -> bool {
        !matches!(self, RepeatCadence::Never)
    }
}

/// Half-open calendar-month window `[first-of-month, first-of-next-month)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Window of the calendar month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = first_of_month(date);
        let end = shift_month(start, 1);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Last calendar day inside the window.
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    pub fn next(&self) -> Self {
        MonthWindow::containing(self.end)
    }
}

/// Normalizes any date to the first of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

pub(crate) fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month() as i32 - 1
}
