//! Day command: a date's entries and ledger.

use std::io::Write;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use wh_core::{DayLedger, UserId, WorkEntry, compute_ledger, format_hours, is_weekend};
use wh_db::Database;

use super::util;

#[derive(Debug, Serialize)]
struct DayReport<'a> {
    date: NaiveDate,
    weekend: bool,
    holiday: Option<&'a str>,
    ledger: DayLedger,
    entries: &'a [WorkEntry],
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &UserId,
    date: NaiveDate,
    json: bool,
) -> Result<()> {
    let calendar = util::month_calendar(db, user, date.year(), date.month())?;
    let entries = db.entries_for_date(user, date)?;
    let report = DayReport {
        date,
        weekend: is_weekend(date),
        holiday: calendar.reason_for(date),
        ledger: compute_ledger(&entries),
        entries: &entries,
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    write!(writer, "{} ({})", date, date.format("%A"))?;
    if let Some(reason) = report.holiday {
        write!(writer, " - holiday: {reason}")?;
    } else if report.weekend {
        write!(writer, " - weekend")?;
    }
    writeln!(writer)?;

    if entries.is_empty() {
        writeln!(writer, "No entries.")?;
    }
    for entry in &entries {
        let amount = if entry.is_full_day_absence() {
            "full day".to_string()
        } else {
            format_hours(entry.hours)
        };
        writeln!(
            writer,
            "  {:<8}  {:>7}  {}  [{}]",
            entry.kind.as_str(),
            amount,
            entry.description,
            entry.id
        )?;
    }

    let ledger = &report.ledger;
    writeln!(
        writer,
        "Worked: {}  External: {}  Extra: {}",
        format_hours(ledger.worked_total),
        format_hours(ledger.external_total),
        format_hours(ledger.extra_total)
    )?;
    if ledger.is_closed() {
        writeln!(writer, "Day complete.")?;
    } else {
        writeln!(writer, "Remaining: {}", format_hours(ledger.remaining_capacity))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use wh_core::{AbsenceReason, Holiday, HolidaySource, ProposedEntry, evaluate_admission};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(
        db: &mut Database,
        user: &UserId,
        day: NaiveDate,
        proposed: &ProposedEntry,
        reason: Option<&AbsenceReason>,
    ) {
        let ledger = compute_ledger(&db.entries_for_date(user, day).unwrap());
        let admission = evaluate_admission(&ledger, proposed, reason).unwrap();
        db.insert_entry(user, day, &admission.entry).unwrap();
    }

    fn render(db: &Database, user: &UserId, day: NaiveDate, json: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, db, user, day, json).unwrap();
        let mut output = String::from_utf8(output).unwrap();
        for entry in db.entries_for_date(user, day).unwrap() {
            output = output.replace(entry.id.as_str(), "[ID]");
        }
        output
    }

    #[test]
    fn day_lists_entries_and_totals() {
        let mut db = Database::open_in_memory().unwrap();
        let user = UserId::new("ana").unwrap();
        let day = date("2025-06-05");
        record(&mut db, &user, day, &ProposedEntry::worked(5.5, "api"), None);
        let medico = AbsenceReason::new("Médico", false);
        record(&mut db, &user, day, &ProposedEntry::absence(Some(2.0)), Some(&medico));

        assert_snapshot!(render(&db, &user, day, false), @r"
        2025-06-05 (Thursday)
          worked     5h 30m  api  [[ID]]
          external       2h  Médico  [[ID]]
        Worked: 5h 30m  External: 2h  Extra: 0m
        Remaining: 30m
        ");
    }

    #[test]
    fn day_marks_holidays_and_weekends() {
        let mut db = Database::open_in_memory().unwrap();
        let user = UserId::new("ana").unwrap();
        db.insert_holiday(&Holiday {
            date: date("2025-06-20"),
            reason: "Belgrano".to_string(),
            user_id: None,
            source: HolidaySource::Sync,
        })
        .unwrap();

        assert_snapshot!(render(&db, &user, date("2025-06-20"), false), @r"
        2025-06-20 (Friday) - holiday: Belgrano
        No entries.
        Worked: 0m  External: 0m  Extra: 0m
        Remaining: 8h
        ");

        let output = render(&db, &user, date("2025-06-21"), false);
        assert!(output.starts_with("2025-06-21 (Saturday) - weekend\n"));
    }

    #[test]
    fn day_json_includes_ledger() {
        let mut db = Database::open_in_memory().unwrap();
        let user = UserId::new("ana").unwrap();
        let day = date("2025-06-04");
        let vacaciones = AbsenceReason::new("Vacaciones", true);
        record(&mut db, &user, day, &ProposedEntry::absence(None), Some(&vacaciones));

        let output = render(&db, &user, day, true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["date"], "2025-06-04");
        assert_eq!(value["weekend"], false);
        assert!(value["holiday"].is_null());
        assert_eq!(value["ledger"]["has_full_day_absence"], true);
        assert_eq!(value["ledger"]["remaining_capacity"], 0.0);
        assert_eq!(value["entries"][0]["kind"], "external");
        assert_eq!(value["entries"][0]["description"], "Vacaciones");
    }
}
