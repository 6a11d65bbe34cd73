//! Monthly statistics over laborable days.
//!
//! Each laborable day falls into exactly one bucket:
//!
//! - **unrecorded**: no entries;
//! - **external**: at least one external absence;
//! - **worked**: everything else, further split by its total hours into
//!   complete (exactly 8), partial (under 8) or extra (over 8).
//!
//! The best streak is the longest run of consecutive laborable days in the
//! worked bucket. Causes and tasks are counted by a folded key, so
//! `Médico`, `medico` and `MEDICO!` are the same cause.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::calendar::HolidayCalendar;
use crate::entry::WorkEntry;
use crate::entry_kind::EntryKind;
use crate::ledger::{DAILY_REQUIRED_HOURS, HOURS_EPSILON, hours_eq};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayHours {
    pub date: NaiveDate,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalDay {
    pub date: NaiveDate,
    pub causes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthStats {
    pub year: i32,
    pub month: u32,
    pub laborable_days: usize,
    pub complete_days: Vec<DayHours>,
    pub partial_days: Vec<DayHours>,

    /// Days with more than the daily requirement.
    pub extra_days: Vec<DayHours>,
    pub external_days: Vec<ExternalDay>,
    pub unrecorded_days: Vec<NaiveDate>,

    /// Worked-bucket days with at least one description.
    pub days_with_description: usize,
    pub total_worked_hours: f64,

    /// Sum of the hours above the requirement on extra days.
    pub extra_hours: f64,
    pub best_streak: Vec<NaiveDate>,

    /// Worked hours over laborable days that were neither external nor
    /// unrecorded.
    pub average_hours_per_day: f64,
    pub cause_counts: BTreeMap<String, usize>,
    pub task_counts: BTreeMap<String, usize>,
    pub task_hours: BTreeMap<String, f64>,
    pub most_frequent_cause: Option<String>,
    pub most_frequent_task: Option<String>,
    pub most_dedicated_task: Option<String>,
}

impl MonthStats {
    pub fn build(
        year: i32,
        month: u32,
        entries: &[WorkEntry],
        calendar: &HolidayCalendar,
    ) -> Self {
        let laborable = calendar.laborable_days(year, month);

        let mut by_date: HashMap<NaiveDate, Vec<&WorkEntry>> = HashMap::new();
        for entry in entries {
            by_date.entry(entry.date).or_default().push(entry);
        }

        let mut stats = Self {
            year,
            month,
            laborable_days: laborable.len(),
            complete_days: Vec::new(),
            partial_days: Vec::new(),
            extra_days: Vec::new(),
            external_days: Vec::new(),
            unrecorded_days: Vec::new(),
            days_with_description: 0,
            total_worked_hours: 0.0,
            extra_hours: 0.0,
            best_streak: Vec::new(),
            average_hours_per_day: 0.0,
            cause_counts: BTreeMap::new(),
            task_counts: BTreeMap::new(),
            task_hours: BTreeMap::new(),
            most_frequent_cause: None,
            most_frequent_task: None,
            most_dedicated_task: None,
        };
        let mut streak = Vec::new();

        for date in laborable {
            let Some(day_entries) = by_date.get(&date) else {
                stats.unrecorded_days.push(date);
                stats.close_streak(&mut streak);
                continue;
            };

            let absences: Vec<_> = day_entries
                .iter()
                .filter(|e| e.kind == EntryKind::ExternalAbsence)
                .collect();
            if !absences.is_empty() {
                for absence in &absences {
                    let cause = normalize_key(&absence.description);
                    if !cause.is_empty() {
                        *stats.cause_counts.entry(cause).or_default() += 1;
                    }
                }
                stats.external_days.push(ExternalDay {
                    date,
                    causes: absences.iter().map(|e| e.description.clone()).collect(),
                });
                stats.close_streak(&mut streak);
                continue;
            }

            stats.record_worked_day(date, day_entries);
            streak.push(date);
        }
        stats.close_streak(&mut streak);

        let effective_days = stats
            .laborable_days
            .saturating_sub(stats.external_days.len())
            .saturating_sub(stats.unrecorded_days.len());
        if effective_days > 0 {
            #[allow(clippy::cast_precision_loss)]
            let divisor = effective_days as f64;
            stats.average_hours_per_day = stats.total_worked_hours / divisor;
        }

        stats.most_frequent_cause = top_key(&stats.cause_counts);
        stats.most_frequent_task = top_key(&stats.task_counts);
        stats.most_dedicated_task = top_key(&stats.task_hours);
        stats
    }

    fn record_worked_day(&mut self, date: NaiveDate, entries: &[&WorkEntry]) {
        let total: f64 = entries.iter().map(|e| e.hours).sum();

        let mut described = false;
        for entry in entries {
            let task = normalize_key(&entry.description);
            if task.is_empty() {
                continue;
            }
            described = true;
            *self.task_counts.entry(task.clone()).or_default() += 1;
            *self.task_hours.entry(task).or_default() += entry.hours;
        }
        if described {
            self.days_with_description += 1;
        }

        let day = DayHours { date, hours: total };
        if hours_eq(total, DAILY_REQUIRED_HOURS) {
            self.complete_days.push(day);
        } else if total > DAILY_REQUIRED_HOURS {
            self.extra_hours += total - DAILY_REQUIRED_HOURS;
            self.extra_days.push(day);
        } else if total > HOURS_EPSILON {
            self.partial_days.push(day);
        }
        self.total_worked_hours += total;
    }

    fn close_streak(&mut self, streak: &mut Vec<NaiveDate>) {
        if streak.len() > self.best_streak.len() {
            self.best_streak = std::mem::take(streak);
        } else {
            streak.clear();
        }
    }
}

/// Folds free text into a grouping key: strips accents, lowercases, drops
/// punctuation and collapses whitespace.
///
/// Absence reason names are matched on the same key, so a cause counted
/// once here is also one entry in the reason catalog.
pub fn normalize_key(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The key with the greatest value; ties go to the alphabetically smallest key.
fn top_key<V: PartialOrd + Copy>(map: &BTreeMap<String, V>) -> Option<String> {
    let mut best: Option<(&String, V)> = None;
    for (key, &v) in map {
        if best.is_none_or(|(_, top)| v > top) {
            best = Some((key, v));
        }
    }
    best.map(|(key, _)| key.clone())
}
