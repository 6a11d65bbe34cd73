//! Monthly summary: expected vs. loaded hours and per-day listings.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::HolidayCalendar;
use crate::entry::WorkEntry;
use crate::entry_kind::EntryKind;
use crate::ledger::DAILY_REQUIRED_HOURS;

/// A date with worked or extra hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkedDay {
    pub date: NaiveDate,
    pub hours: f64,

    /// Descriptions in entry order; extra ones end in ` (extra)`.
    pub descriptions: Vec<String>,
}

/// One external absence entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceRow {
    pub date: NaiveDate,
    pub cause: String,

    /// Effective hours; a full-day absence counts the whole day.
    pub hours: f64,
    pub full_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub laborable_days: usize,
    pub expected_hours: f64,

    /// Worked plus extra hours.
    pub loaded_hours: f64,
    pub progress_percent: u8,
    pub worked_days: Vec<WorkedDay>,
    pub absences: Vec<AbsenceRow>,

    /// Laborable dates with no entries at all.
    pub unrecorded_days: Vec<NaiveDate>,
}

impl MonthSummary {
    /// Summarizes `entries` for one month. Entries of other months are ignored.
    pub fn build(
        year: i32,
        month: u32,
        entries: &[WorkEntry],
        calendar: &HolidayCalendar,
    ) -> Self {
        let laborable = calendar.laborable_days(year, month);
        #[allow(clippy::cast_precision_loss)]
        let expected_hours = laborable.len() as f64 * DAILY_REQUIRED_HOURS;

        let mut worked: BTreeMap<NaiveDate, WorkedDay> = BTreeMap::new();
        let mut absences = Vec::new();
        let mut recorded = BTreeSet::new();

        for entry in entries
            .iter()
            .filter(|e| e.date.year() == year && e.date.month() == month)
        {
            recorded.insert(entry.date);
            match entry.kind {
                EntryKind::Worked | EntryKind::ExtraWorked => {
                    let day = worked.entry(entry.date).or_insert_with(|| WorkedDay {
                        date: entry.date,
                        hours: 0.0,
                        descriptions: Vec::new(),
                    });
                    day.hours += entry.hours;
                    if !entry.description.is_empty() {
                        day.descriptions.push(if entry.kind == EntryKind::ExtraWorked {
                            format!("{} (extra)", entry.description)
                        } else {
                            entry.description.clone()
                        });
                    }
                }
                EntryKind::ExternalAbsence => absences.push(AbsenceRow {
                    date: entry.date,
                    cause: entry.description.clone(),
                    hours: entry.effective_hours(),
                    full_day: entry.is_full_day_absence(),
                }),
            }
        }
        absences.sort_by_key(|a| a.date);

        let loaded_hours = worked.values().map(|d| d.hours).sum();
        let unrecorded_days = laborable
            .iter()
            .copied()
            .filter(|d| !recorded.contains(d))
            .collect();

        Self {
            year,
            month,
            laborable_days: laborable.len(),
            expected_hours,
            loaded_hours,
            progress_percent: progress_percent(loaded_hours, expected_hours),
            worked_days: worked.into_values().collect(),
            absences,
            unrecorded_days,
        }
    }
}

/// `loaded / expected` as a whole percentage, capped at 100.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_percent(loaded: f64, expected: f64) -> u8 {
    if expected <= 0.0 || !loaded.is_finite() {
        return 0;
    }
    (loaded / expected * 100.0).round().clamp(0.0, 100.0) as u8
}
