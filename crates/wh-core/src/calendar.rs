//! Laborable days and the rules for opening a date for entry.
//!
//! A laborable day is neither a weekend nor a holiday. Opening a laborable
//! date checks the previous laborable date of the same month: when that day
//! is not closed, the user is warned (or stopped, with
//! [`EntryPolicy::enforce_previous_day_check`]).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::entry::Holiday;
use crate::ledger::DayLedger;

/// Returns true for Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Walks back from `date` to the closest earlier day that is neither a
/// holiday nor a weekend.
///
/// Returns [`NaiveDate::MIN`] if no such day exists.
pub fn previous_laborable_date(
    date: NaiveDate,
    is_holiday: impl Fn(NaiveDate) -> bool,
    is_weekend: impl Fn(NaiveDate) -> bool,
) -> NaiveDate {
    let mut current = date;
    while let Some(prev) = current.pred_opt() {
        if !is_holiday(prev) && !is_weekend(prev) {
            return prev;
        }
        current = prev;
    }
    NaiveDate::MIN
}

/// All dates of a month, in order. Empty for an invalid month.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|d| d.month() == month)
        .collect()
}

/// First and last date of a month, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Holidays visible to one user: public ones plus the user's custom ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeMap<NaiveDate, String>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a calendar from holiday records. On duplicate dates the last
    /// record wins.
    pub fn from_holidays<'a>(holidays: impl IntoIterator<Item = &'a Holiday>) -> Self {
        let mut calendar = Self::new();
        for holiday in holidays {
            calendar.insert(holiday.date, holiday.reason.clone());
        }
        calendar
    }

    pub fn insert(&mut self, date: NaiveDate, reason: impl Into<String>) {
        self.holidays.insert(date, reason.into());
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    pub fn reason_for(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    pub fn is_laborable(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }

    /// Laborable dates of a month, in order.
    pub fn laborable_days(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        month_days(year, month)
            .into_iter()
            .filter(|d| self.is_laborable(*d))
            .collect()
    }

    pub fn previous_laborable(&self, date: NaiveDate) -> NaiveDate {
        previous_laborable_date(date, |d| self.is_holiday(d), is_weekend)
    }

    /// The day whose completeness gates opening `date`.
    ///
    /// `None` for non-laborable dates and for the first laborable date of a
    /// month.
    pub fn gating_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        if !self.is_laborable(date) {
            return None;
        }
        let previous = self.previous_laborable(date);
        (previous.year() == date.year() && previous.month() == date.month()).then_some(previous)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

/// Flags for the checks made before a date is opened for entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPolicy {
    /// Refuse entry while the previous laborable day is incomplete, instead
    /// of only warning.
    pub enforce_previous_day_check: bool,

    /// Ask for confirmation before recording on a weekend.
    pub confirm_weekend_entry: bool,
}

impl Default for EntryPolicy {
    fn default() -> Self {
        Self {
            enforce_previous_day_check: false,
            confirm_weekend_entry: true,
        }
    }
}

/// Outcome of [`evaluate_opening`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum OpeningDecision {
    Open,

    /// The date is a weekend and the policy wants confirmation.
    ConfirmWeekend,

    /// The previous laborable day of the month is not closed.
    PreviousDayIncomplete {
        previous: NaiveDate,

        /// Worked plus external hours on `previous`.
        recorded_hours: f64,

        /// Whether entry must be refused rather than only warned about.
        enforced: bool,
    },
}

/// Decides whether `date` may be opened for entry.
///
/// `previous_ledger` is the ledger of [`HolidayCalendar::gating_day`] for
/// `date`; it is ignored when there is no gating day.
pub fn evaluate_opening(
    date: NaiveDate,
    calendar: &HolidayCalendar,
    policy: &EntryPolicy,
    previous_ledger: Option<&DayLedger>,
) -> OpeningDecision {
    if is_weekend(date) {
        return if policy.confirm_weekend_entry {
            OpeningDecision::ConfirmWeekend
        } else {
            OpeningDecision::Open
        };
    }

    let Some(previous) = calendar.gating_day(date) else {
        return OpeningDecision::Open;
    };

    let ledger = previous_ledger.copied().unwrap_or_default();
    if ledger.is_closed() {
        OpeningDecision::Open
    } else {
        OpeningDecision::PreviousDayIncomplete {
            previous,
            recorded_hours: ledger.accounted_hours(),
            enforced: policy.enforce_previous_day_check,
        }
    }
}
