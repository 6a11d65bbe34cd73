//! Month command: expected vs. loaded hours and per-day listings.

use std::io::Write;

use anyhow::{Context, Result};
use wh_core::{MonthSummary, UserId, format_hours, month_bounds};
use wh_db::Database;

use super::util;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &UserId,
    year: i32,
    month: u32,
    json: bool,
) -> Result<()> {
    let (start, end) =
        month_bounds(year, month).with_context(|| format!("invalid month {year}-{month:02}"))?;
    let calendar = util::month_calendar(db, user, year, month)?;
    let entries = db.entries_in_range(user, start, end)?;
    let summary = MonthSummary::build(year, month, &entries, &calendar);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    writeln!(writer, "{}", start.format("%B %Y"))?;
    writeln!(writer, "Laborable days: {}", summary.laborable_days)?;
    writeln!(
        writer,
        "Expected: {}  Loaded: {}  ({}%)",
        format_hours(summary.expected_hours),
        format_hours(summary.loaded_hours),
        summary.progress_percent
    )?;

    if !summary.worked_days.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Worked days:")?;
        for day in &summary.worked_days {
            writeln!(
                writer,
                "  {}  {:>7}  {}",
                day.date,
                format_hours(day.hours),
                day.descriptions.join(", ")
            )?;
        }
    }

    if !summary.absences.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Absences:")?;
        for absence in &summary.absences {
            let amount = if absence.full_day {
                "full day".to_string()
            } else {
                format_hours(absence.hours)
            };
            writeln!(writer, "  {}  {amount:>8}  {}", absence.date, absence.cause)?;
        }
    }

    if !summary.unrecorded_days.is_empty() {
        writeln!(writer)?;
        writeln!(
            writer,
            "Unrecorded days ({}):",
            summary.unrecorded_days.len()
        )?;
        for date in &summary.unrecorded_days {
            writeln!(writer, "  {} ({})", date, date.format("%a"))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use insta::assert_snapshot;
    use wh_core::{
        AbsenceReason, Holiday, HolidaySource, ProposedEntry, compute_ledger, evaluate_admission,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(
        db: &mut Database,
        user: &UserId,
        day: &str,
        proposed: &ProposedEntry,
        reason: Option<&AbsenceReason>,
    ) {
        let day = date(day);
        let ledger = compute_ledger(&db.entries_for_date(user, day).unwrap());
        let admission = evaluate_admission(&ledger, proposed, reason).unwrap();
        db.insert_entry(user, day, &admission.entry).unwrap();
    }

    /// February 2025 has 20 weekdays; the 28th is a custom holiday.
    fn february_db(user: &UserId) -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_holiday(&Holiday {
            date: date("2025-02-28"),
            reason: "Mudanza".to_string(),
            user_id: Some(user.clone()),
            source: HolidaySource::Custom,
        })
        .unwrap();

        let vacaciones = AbsenceReason::new("Vacaciones", true);
        let medico = AbsenceReason::new("Médico", false);
        for day in 3..=14 {
            let day = format!("2025-02-{day:02}");
            if !wh_core::is_weekend(date(&day)) {
                record(&mut db, user, &day, &ProposedEntry::worked(8.0, "api"), None);
            }
        }
        record(&mut db, user, "2025-02-14", &ProposedEntry::extra(1.5, "deploy"), None);
        record(&mut db, user, "2025-02-17", &ProposedEntry::absence(None), Some(&vacaciones));
        record(&mut db, user, "2025-02-18", &ProposedEntry::worked(6.0, "docs"), None);
        record(
            &mut db,
            user,
            "2025-02-18",
            &ProposedEntry::absence(Some(2.0)),
            Some(&medico),
        );
        db
    }

    #[test]
    fn month_command_outputs_summary() {
        let user = UserId::new("ana").unwrap();
        let db = february_db(&user);

        let mut output = Vec::new();
        run(&mut output, &db, &user, 2025, 2, false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        February 2025
        Laborable days: 19
        Expected: 152h  Loaded: 87h 30m  (58%)

        Worked days:
          2025-02-03       8h  api
          2025-02-04       8h  api
          2025-02-05       8h  api
          2025-02-06       8h  api
          2025-02-07       8h  api
          2025-02-10       8h  api
          2025-02-11       8h  api
          2025-02-12       8h  api
          2025-02-13       8h  api
          2025-02-14   9h 30m  api, deploy (extra)
          2025-02-18       6h  docs

        Absences:
          2025-02-17  full day  Vacaciones
          2025-02-18        2h  Médico

        Unrecorded days (7):
          2025-02-19 (Wed)
          2025-02-20 (Thu)
          2025-02-21 (Fri)
          2025-02-24 (Mon)
          2025-02-25 (Tue)
          2025-02-26 (Wed)
          2025-02-27 (Thu)
        ");
    }

    #[test]
    fn month_command_json_output() {
        let user = UserId::new("ana").unwrap();
        let db = february_db(&user);

        let mut output = Vec::new();
        run(&mut output, &db, &user, 2025, 2, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["laborable_days"], 19);
        assert_eq!(value["expected_hours"], 152.0);
        assert_eq!(value["loaded_hours"], 87.5);
        assert_eq!(value["progress_percent"], 58);
        assert_eq!(value["absences"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn month_command_ignores_other_users() {
        let user = UserId::new("ana").unwrap();
        let db = february_db(&user);
        let other = UserId::new("luis").unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &other, 2025, 2, false).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Laborable days: 20\n"));
        assert!(output.contains("Unrecorded days (20):"));
        assert!(!output.contains("Worked days:"));
    }
}
