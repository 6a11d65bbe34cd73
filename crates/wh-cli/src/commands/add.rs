//! Add command: runs the opening gate and admission rules, then stores the entry.
//!
//! The day's entries are re-read from the store right before the admission
//! check, and nothing is written unless the entry is admitted. A cause that
//! is not in the catalog yet is saved as a personal reason only after that.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};
use wh_core::{
    AbsenceReason, EntryPolicy, OpeningDecision, ProposedEntry, UserId, compute_ledger,
    evaluate_admission, evaluate_opening, format_hours, normalize_key,
};
use wh_db::Database;

use super::util;

/// What to add, with hours already parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum AddRequest {
    Worked {
        hours: f64,
        description: String,
    },
    Extra {
        hours: f64,
        description: String,
    },
    Absence {
        cause: String,
        hours: Option<f64>,

        /// Full-day flag for a cause that is not in the catalog yet.
        /// `None` means full-day unless hours were given.
        full_day: Option<bool>,
    },
}

/// Overrides for the opening gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateOverrides {
    /// Confirms a weekend date.
    pub yes: bool,

    /// Skips an enforced previous-day check.
    pub force: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: &UserId,
    policy: &EntryPolicy,
    date: NaiveDate,
    request: &AddRequest,
    overrides: GateOverrides,
) -> Result<()> {
    check_opening(db, user, policy, date, overrides)?;

    let entries = db.entries_for_date(user, date)?;
    let ledger = compute_ledger(&entries);

    let (proposed, reason, new_reason) = match request {
        AddRequest::Worked { hours, description } => {
            (ProposedEntry::worked(*hours, description.as_str()), None, false)
        }
        AddRequest::Extra { hours, description } => {
            (ProposedEntry::extra(*hours, description.as_str()), None, false)
        }
        AddRequest::Absence {
            cause,
            hours,
            full_day,
        } => {
            let (reason, new_reason) = resolve_reason(db, user, cause, *hours, *full_day)?;
            (ProposedEntry::absence(*hours), reason, new_reason)
        }
    };

    let admission = evaluate_admission(&ledger, &proposed, reason.as_ref())
        .with_context(|| format!("cannot add {} entry on {date}", proposed.kind))?;

    if let Some(reason) = reason.as_ref().filter(|_| new_reason) {
        db.insert_reason(Some(user), &reason.name, reason.full_day)?;
        let scope = if reason.full_day { "full-day" } else { "partial" };
        writeln!(writer, "Saved new {scope} reason \"{}\"", reason.name)?;
    }

    let stored = db.insert_entry(user, date, &admission.entry)?;
    debug!(id = %stored.id, %date, kind = %stored.kind, "entry added");

    let amount = if stored.is_full_day_absence() {
        "full day".to_string()
    } else {
        format_hours(stored.hours)
    };
    writeln!(
        writer,
        "Added {} entry {} on {date}: {amount} {}",
        stored.kind, stored.id, stored.description
    )?;

    let day = admission.ledger;
    writeln!(
        writer,
        "Day: worked {}, external {}, extra {}",
        format_hours(day.worked_total),
        format_hours(day.external_total),
        format_hours(day.extra_total)
    )?;
    if day.is_closed() {
        writeln!(writer, "Day complete.")?;
    } else {
        writeln!(writer, "Remaining: {}", format_hours(day.remaining_capacity))?;
    }

    Ok(())
}

fn check_opening(
    db: &Database,
    user: &UserId,
    policy: &EntryPolicy,
    date: NaiveDate,
    overrides: GateOverrides,
) -> Result<()> {
    let calendar = util::month_calendar(db, user, date.year(), date.month())?;
    let previous_ledger = calendar
        .gating_day(date)
        .map(|previous| db.entries_for_date(user, previous))
        .transpose()?
        .map(|entries| compute_ledger(&entries));

    match evaluate_opening(date, &calendar, policy, previous_ledger.as_ref()) {
        OpeningDecision::Open => {}
        OpeningDecision::ConfirmWeekend => {
            if !overrides.yes {
                bail!("{date} is a weekend; pass --yes to record on it");
            }
        }
        OpeningDecision::PreviousDayIncomplete {
            previous,
            recorded_hours,
            enforced,
        } => {
            if enforced && !overrides.force {
                bail!(
                    "previous laborable day {previous} is incomplete ({} of 8h recorded); \
                     complete it first or pass --force",
                    format_hours(recorded_hours)
                );
            }
            warn!(
                %previous,
                recorded = %format_hours(recorded_hours),
                "previous laborable day is incomplete"
            );
        }
    }
    Ok(())
}

/// Finds `cause` in the catalog, or prepares a new personal reason for it.
///
/// Returns the reason and whether it still has to be saved.
fn resolve_reason(
    db: &Database,
    user: &UserId,
    cause: &str,
    hours: Option<f64>,
    full_day: Option<bool>,
) -> Result<(Option<AbsenceReason>, bool)> {
    let cause = cause.trim();
    if cause.is_empty() {
        return Ok((None, false));
    }

    if let Some(record) = db.find_reason(user, cause)? {
        if record.full_day && hours.is_some() {
            warn!(reason = %record.name, "hours are ignored for a full-day reason");
        }
        if full_day.is_some_and(|flag| flag != record.full_day) {
            warn!(reason = %record.name, "existing reason keeps its full-day setting");
        }
        return Ok((Some(record.to_reason()), false));
    }

    if normalize_key(cause).is_empty() {
        bail!("absence cause \"{cause}\" has no letters or digits");
    }
    let full_day = full_day.unwrap_or(hours.is_none());
    Ok((Some(AbsenceReason::new(cause, full_day)), true))
}
