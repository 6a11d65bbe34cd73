//! Core domain logic for the work hours ledger.
//!
//! This crate contains the fundamental types and logic for:
//! - Ledger: aggregating a day's entries into worked, external and extra totals
//! - Admission: deciding whether a proposed entry may be added to a day
//! - Calendar: laborable days, holidays and the checks for opening a date
//! - Reporting: monthly summaries and statistics
//!
//! Nothing here performs I/O. Callers load entries from a store, ask this
//! crate for a decision, and persist the result themselves.

pub mod admission;
pub mod calendar;
mod entry;
pub mod entry_kind;
pub mod hours;
pub mod ledger;
pub mod stats;
pub mod summary;
pub mod types;

pub use admission::{
    Admission, AdmissionError, AdmittedEntry, ProposedEntry, evaluate_admission,
};
pub use calendar::{
    EntryPolicy, HolidayCalendar, OpeningDecision, evaluate_opening, is_weekend,
    month_bounds, previous_laborable_date,
};
pub use entry::{AbsenceReason, Holiday, WorkEntry};
pub use entry_kind::{EntryKind, UnknownEntryKind};
pub use hours::{HoursParseError, format_hours, parse_hours};
pub use ledger::{DAILY_REQUIRED_HOURS, DayLedger, LedgerEntry, compute_ledger};
pub use stats::{MonthStats, normalize_key};
pub use summary::MonthSummary;
pub use types::{EntryId, HolidaySource, UserId, ValidationError};
