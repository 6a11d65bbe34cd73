//! Admission rules for new entries on a day.
//!
//! [`evaluate_admission`] is a pure function of the day's [`DayLedger`] and a
//! proposed entry. It performs no I/O; callers persist the admitted entry
//! only when it returns `Ok`.
//!
//! # Decision Procedure
//!
//! 1. A day closed by a full-day absence admits nothing.
//! 2. An external absence needs a cause. A full-day cause needs an empty
//!    day and is committed with zero hours; a partial cause needs hours in
//!    `(0, remaining_capacity]`.
//! 3. Worked hours need a description and hours in `(0, remaining_capacity]`.
//! 4. Extra hours need a full worked day with no absence, positive hours and
//!    a description.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::entry::AbsenceReason;
use crate::entry_kind::EntryKind;
use crate::hours::format_hours;
use crate::ledger::{DayLedger, HOURS_EPSILON, LedgerEntry, hours_at_least};

/// Why a proposed entry was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdmissionError {
    #[error("an absence needs a cause")]
    MissingCause,

    #[error("{kind} entries need a description")]
    MissingDescription { kind: EntryKind },

    /// `max` is `None` for kinds without an upper bound.
    #[error("invalid hours amount: {}", describe_hours(.requested, .max))]
    InvalidHoursAmount {
        requested: Option<f64>,
        max: Option<f64>,
    },

    #[error("the day is already closed by a full-day absence")]
    DayAlreadyClosed,

    #[error("a full-day absence needs an empty day, {recorded}h already recorded")]
    DayNotEmptyForFullDayAbsence { recorded: f64 },

    #[error("extra hours need exactly 8h worked and no absence on the day")]
    ExtraNotEligible,
}

#[allow(clippy::ref_option)]
fn describe_hours(requested: &Option<f64>, max: &Option<f64>) -> String {
    let bound = match *max {
        Some(max) if max < HOURS_EPSILON => "no hours remain on this day".to_string(),
        Some(max) => format!("must be more than 0m and at most {}", format_hours(max)),
        None => "must be more than 0m".to_string(),
    };
    match *requested {
        Some(hours) => format!("got {hours}, {bound}"),
        None => format!("hours are required, {bound}"),
    }
}

/// A candidate entry before admission.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedEntry {
    pub kind: EntryKind,

    /// Requested hours. Unset for full-day absences, which resolve to zero.
    pub hours: Option<f64>,

    /// Task description. Ignored for absences, which take the cause name.
    pub description: String,
}

impl ProposedEntry {
    pub fn worked(hours: f64, description: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Worked,
            hours: Some(hours),
            description: description.into(),
        }
    }

    pub fn extra(hours: f64, description: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::ExtraWorked,
            hours: Some(hours),
            description: description.into(),
        }
    }

    pub const fn absence(hours: Option<f64>) -> Self {
        Self {
            kind: EntryKind::ExternalAbsence,
            hours,
            description: String::new(),
        }
    }
}

/// The entry to persist, with hours resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmittedEntry {
    pub kind: EntryKind,
    pub hours: f64,
    pub description: String,
}

impl LedgerEntry for AdmittedEntry {
    fn kind(&self) -> EntryKind {
        self.kind
    }

    fn hours(&self) -> f64 {
        self.hours
    }
}

/// A successful admission: what to store and the ledger to expect afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admission {
    pub entry: AdmittedEntry,
    pub ledger: DayLedger,
}

/// Decides whether `proposed` may be added to a day with `ledger`.
///
/// `reason` is the resolved cause for an external absence, either from the
/// catalog or newly defined by the user; it is ignored for other kinds.
///
/// # Errors
///
/// Returns the [`AdmissionError`] for the first rule the entry breaks.
pub fn evaluate_admission(
    ledger: &DayLedger,
    proposed: &ProposedEntry,
    reason: Option<&AbsenceReason>,
) -> Result<Admission, AdmissionError> {
    let result = check(ledger, proposed, reason).map(|entry| Admission {
        ledger: ledger.with_entry(entry.kind, entry.hours),
        entry,
    });
    if let Err(err) = &result {
        debug!(kind = %proposed.kind, error = %err, "entry rejected");
    }
    result
}

fn check(
    ledger: &DayLedger,
    proposed: &ProposedEntry,
    reason: Option<&AbsenceReason>,
) -> Result<AdmittedEntry, AdmissionError> {
    if ledger.has_full_day_absence {
        return Err(AdmissionError::DayAlreadyClosed);
    }

    match proposed.kind {
        EntryKind::ExternalAbsence => check_absence(ledger, proposed, reason),
        EntryKind::Worked => {
            let description = require_description(proposed)?;
            let hours = require_hours(proposed.hours, Some(ledger.remaining_capacity))?;
            Ok(AdmittedEntry {
                kind: EntryKind::Worked,
                hours,
                description,
            })
        }
        EntryKind::ExtraWorked => {
            if !ledger.is_extra_eligible() {
                return Err(AdmissionError::ExtraNotEligible);
            }
            let hours = require_hours(proposed.hours, None)?;
            let description = require_description(proposed)?;
            Ok(AdmittedEntry {
                kind: EntryKind::ExtraWorked,
                hours,
                description,
            })
        }
    }
}

fn check_absence(
    ledger: &DayLedger,
    proposed: &ProposedEntry,
    reason: Option<&AbsenceReason>,
) -> Result<AdmittedEntry, AdmissionError> {
    let reason = reason
        .filter(|r| !r.name.trim().is_empty())
        .ok_or(AdmissionError::MissingCause)?;

    let hours = if reason.full_day {
        if !ledger.has_no_accounted_hours() {
            return Err(AdmissionError::DayNotEmptyForFullDayAbsence {
                recorded: ledger.accounted_hours(),
            });
        }
        0.0
    } else {
        require_hours(proposed.hours, Some(ledger.remaining_capacity))?
    };

    Ok(AdmittedEntry {
        kind: EntryKind::ExternalAbsence,
        hours,
        description: reason.name.trim().to_string(),
    })
}

fn require_description(proposed: &ProposedEntry) -> Result<String, AdmissionError> {
    let description = proposed.description.trim();
    if description.is_empty() {
        return Err(AdmissionError::MissingDescription {
            kind: proposed.kind,
        });
    }
    Ok(description.to_string())
}

/// Accepts hours in `(0, max]`, or any positive amount when `max` is `None`.
fn require_hours(requested: Option<f64>, max: Option<f64>) -> Result<f64, AdmissionError> {
    let invalid = || AdmissionError::InvalidHoursAmount { requested, max };
    let hours = requested.ok_or_else(invalid)?;
    if !hours.is_finite() || hours < HOURS_EPSILON {
        return Err(invalid());
    }
    if max.is_some_and(|max| !hours_at_least(max, hours)) {
        return Err(invalid());
    }
    Ok(hours)
}
