//! Daily hour ledger.
//!
//! A [`DayLedger`] is derived from all entries of one date and is never stored.
//!
//! # Accounting Rules
//!
//! - `worked_total` sums `worked` entries.
//! - `external_total` sums `external` entries, where a zero-hour entry is a
//!   full-day absence and counts the whole [`DAILY_REQUIRED_HOURS`].
//! - `extra_total` sums `extra` entries and never counts toward the requirement.
//! - `remaining_capacity` is what is left of the requirement after worked and
//!   external hours, floored at zero.

use serde::Serialize;

use crate::entry_kind::EntryKind;

/// Hours every laborable day is expected to account for.
pub const DAILY_REQUIRED_HOURS: f64 = 8.0;

/// Tolerance for hour comparisons.
///
/// Hours are entered in minutes, so sums such as `7h 50m + 10m` are not exact
/// in binary floating point.
pub const HOURS_EPSILON: f64 = 1e-6;

/// An entry that can be aggregated into a [`DayLedger`].
///
/// This trait allows aggregation over stored entries, proposed entries and
/// test fixtures alike.
pub trait LedgerEntry {
    /// Returns the entry's kind.
    fn kind(&self) -> EntryKind;

    /// Returns the hours recorded on the entry.
    fn hours(&self) -> f64;
}

impl LedgerEntry for (EntryKind, f64) {
    fn kind(&self) -> EntryKind {
        self.0
    }

    fn hours(&self) -> f64 {
        self.1
    }
}

/// Aggregated hour totals for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayLedger {
    pub worked_total: f64,
    pub external_total: f64,
    pub extra_total: f64,
    pub has_full_day_absence: bool,
    pub remaining_capacity: f64,
}

impl Default for DayLedger {
    fn default() -> Self {
        Self::from_totals(0.0, 0.0, 0.0, false)
    }
}

impl DayLedger {
    pub(crate) fn from_totals(
        worked_total: f64,
        external_total: f64,
        extra_total: f64,
        has_full_day_absence: bool,
    ) -> Self {
        let remaining = DAILY_REQUIRED_HOURS - (worked_total + external_total);
        let remaining_capacity = if remaining < HOURS_EPSILON {
            0.0
        } else {
            remaining
        };
        Self {
            worked_total,
            external_total,
            extra_total,
            has_full_day_absence,
            remaining_capacity,
        }
    }

    /// Worked plus external hours.
    pub fn accounted_hours(&self) -> f64 {
        self.worked_total + self.external_total
    }

    /// True when nothing counts toward the requirement yet.
    pub fn has_no_accounted_hours(&self) -> bool {
        hours_eq(self.accounted_hours(), 0.0)
    }

    /// True when the requirement is met, either by hours or a full-day absence.
    pub fn is_closed(&self) -> bool {
        self.has_full_day_absence || hours_at_least(self.accounted_hours(), DAILY_REQUIRED_HOURS)
    }

    /// True when extra hours may be recorded: a full worked day with no absence.
    pub fn is_extra_eligible(&self) -> bool {
        hours_eq(self.worked_total, DAILY_REQUIRED_HOURS)
            && hours_eq(self.external_total, 0.0)
            && !self.has_full_day_absence
    }

    /// Returns the ledger after adding one entry's contribution.
    #[must_use]
    pub fn with_entry(&self, kind: EntryKind, hours: f64) -> Self {
        let mut worked = self.worked_total;
        let mut external = self.external_total;
        let mut extra = self.extra_total;
        let mut full_day = self.has_full_day_absence;
        match kind {
            EntryKind::Worked => worked += hours,
            EntryKind::ExternalAbsence if hours == 0.0 => {
                external += DAILY_REQUIRED_HOURS;
                full_day = true;
            }
            EntryKind::ExternalAbsence => external += hours,
            EntryKind::ExtraWorked => extra += hours,
        }
        Self::from_totals(worked, external, extra, full_day)
    }

    /// Compares two ledgers within [`HOURS_EPSILON`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.has_full_day_absence == other.has_full_day_absence
            && hours_eq(self.worked_total, other.worked_total)
            && hours_eq(self.external_total, other.external_total)
            && hours_eq(self.extra_total, other.extra_total)
            && hours_eq(self.remaining_capacity, other.remaining_capacity)
    }
}

/// Aggregates the entries of one date into a [`DayLedger`].
///
/// The result does not depend on the order of `entries`: each total is summed
/// over its values in sorted order.
pub fn compute_ledger<E: LedgerEntry>(entries: &[E]) -> DayLedger {
    let mut worked = Vec::new();
    let mut external = Vec::new();
    let mut extra = Vec::new();
    let mut full_day = false;

    for entry in entries {
        let hours = entry.hours();
        match entry.kind() {
            EntryKind::Worked => worked.push(hours),
            EntryKind::ExternalAbsence if hours == 0.0 => {
                external.push(DAILY_REQUIRED_HOURS);
                full_day = true;
            }
            EntryKind::ExternalAbsence => external.push(hours),
            EntryKind::ExtraWorked => extra.push(hours),
        }
    }

    DayLedger::from_totals(
        stable_sum(worked),
        stable_sum(external),
        stable_sum(extra),
        full_day,
    )
}

fn stable_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// Equality within [`HOURS_EPSILON`].
pub fn hours_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < HOURS_EPSILON
}

/// `a >= b` within [`HOURS_EPSILON`].
pub fn hours_at_least(a: f64, b: f64) -> bool {
    a > b - HOURS_EPSILON
}
