//! Work entries, absence reasons and holidays.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::entry_kind::EntryKind;
use crate::ledger::{DAILY_REQUIRED_HOURS, LedgerEntry};
use crate::types::{EntryId, HolidaySource, UserId};

/// One record of time accounted against a calendar date.
///
/// Entries are never edited in place. Changing an entry means deleting it and
/// adding a new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkEntry {
    /// Identifier assigned by the record store.
    pub id: EntryId,

    /// Owner of the entry.
    pub user_id: UserId,

    /// Calendar day the hours belong to.
    pub date: NaiveDate,

    pub kind: EntryKind,

    /// Hours accounted. Zero on an external absence means a full-day absence.
    pub hours: f64,

    /// Task description, or the cause name for an external absence.
    pub description: String,

    /// When the entry was stored.
    pub created_at: DateTime<Utc>,
}

impl WorkEntry {
    /// Returns true for the full-day absence encoding (`external` with zero hours).
    pub fn is_full_day_absence(&self) -> bool {
        self.kind == EntryKind::ExternalAbsence && self.hours == 0.0
    }

    /// Hours this entry counts for, with a full-day absence counting the whole day.
    pub fn effective_hours(&self) -> f64 {
        if self.is_full_day_absence() {
            DAILY_REQUIRED_HOURS
        } else {
            self.hours
        }
    }
}

impl LedgerEntry for WorkEntry {
    fn kind(&self) -> EntryKind {
        self.kind
    }

    fn hours(&self) -> f64 {
        self.hours
    }
}

/// A named cause of absence, resolved to its name and full-day flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbsenceReason {
    pub name: String,

    /// Whether the reason always consumes the full daily requirement.
    pub full_day: bool,
}

impl AbsenceReason {
    pub fn new(name: impl Into<String>, full_day: bool) -> Self {
        Self {
            name: name.into(),
            full_day,
        }
    }
}

/// A non-laborable date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub reason: String,

    /// Owner of a custom holiday; `None` for public holidays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    pub source: HolidaySource,
}
