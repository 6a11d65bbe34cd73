//! Stats command: monthly statistics dashboard.

use std::io::Write;

use anyhow::{Context, Result};
use wh_core::{MonthStats, UserId, format_hours, month_bounds};
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
    let stats = MonthStats::build(year, month, &entries, &calendar);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&stats)?)?;
        return Ok(());
    }

    writeln!(writer, "Statistics for {}", start.format("%B %Y"))?;
    writeln!(writer, "Laborable days: {}", stats.laborable_days)?;
    writeln!(writer, "Complete days: {}", stats.complete_days.len())?;
    writeln!(writer, "Partial days: {}", stats.partial_days.len())?;
    writeln!(
        writer,
        "Extra days: {} (+{})",
        stats.extra_days.len(),
        format_hours(stats.extra_hours)
    )?;
    writeln!(writer, "External days: {}", stats.external_days.len())?;
    writeln!(writer, "Unrecorded days: {}", stats.unrecorded_days.len())?;
    writeln!(
        writer,
        "Days with description: {}",
        stats.days_with_description
    )?;
    writeln!(
        writer,
        "Total worked: {}",
        format_hours(stats.total_worked_hours)
    )?;
    writeln!(
        writer,
        "Average per day: {}",
        format_hours(stats.average_hours_per_day)
    )?;

    match (stats.best_streak.first(), stats.best_streak.last()) {
        (Some(first), Some(last)) => writeln!(
            writer,
            "Best streak: {} days ({first} to {last})",
            stats.best_streak.len()
        )?,
        _ => writeln!(writer, "Best streak: none")?,
    }

    for (label, value) in [
        ("Most frequent cause", &stats.most_frequent_cause),
        ("Most frequent task", &stats.most_frequent_task),
        ("Most dedicated task", &stats.most_dedicated_task),
    ] {
        writeln!(writer, "{label}: {}", value.as_deref().unwrap_or("-"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use insta::assert_snapshot;
    use wh_core::{AbsenceReason, ProposedEntry, compute_ledger, evaluate_admission};

    fn record(
        db: &mut Database,
        user: &UserId,
        day: u32,
        proposed: &ProposedEntry,
        reason: Option<&AbsenceReason>,
    ) {
        let day = NaiveDate::from_ymd_opt(2025, 2, day).unwrap();
        let ledger = compute_ledger(&db.entries_for_date(user, day).unwrap());
        let admission = evaluate_admission(&ledger, proposed, reason).unwrap();
        db.insert_entry(user, day, &admission.entry).unwrap();
    }

    #[test]
    fn stats_command_outputs_dashboard() {
        let mut db = Database::open_in_memory().unwrap();
        let user = UserId::new("ana").unwrap();
        let vacaciones = AbsenceReason::new("Vacaciones", true);
        let medico = AbsenceReason::new("Médico", false);

        // February 2025: weekdays 3-7 and 10-14 fully worked.
        for day in [3, 4, 5, 6, 7, 10, 11, 12, 13, 14] {
            record(&mut db, &user, day, &ProposedEntry::worked(8.0, "API"), None);
        }
        record(&mut db, &user, 14, &ProposedEntry::extra(1.5, "Deploy!"), None);
        record(&mut db, &user, 17, &ProposedEntry::absence(None), Some(&vacaciones));
        record(&mut db, &user, 18, &ProposedEntry::worked(6.0, "docs"), None);
        record(&mut db, &user, 18, &ProposedEntry::absence(Some(2.0)), Some(&medico));
        record(&mut db, &user, 19, &ProposedEntry::worked(4.0, "docs"), None);

        let mut output = Vec::new();
        run(&mut output, &db, &user, 2025, 2, false).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Statistics for February 2025
        Laborable days: 20
        Complete days: 9
        Partial days: 1
        Extra days: 1 (+1h 30m)
        External days: 2
        Unrecorded days: 7
        Days with description: 11
        Total worked: 85h 30m
        Average per day: 7h 46m
        Best streak: 10 days (2025-02-03 to 2025-02-14)
        Most frequent cause: medico
        Most frequent task: api
        Most dedicated task: api
        ");
    }

    #[test]
    fn stats_command_handles_empty_month() {
        let db = Database::open_in_memory().unwrap();
        let user = UserId::new("ana").unwrap();

        let mut output = Vec::new();
        run(&mut output, &db, &user, 2025, 2, false).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Unrecorded days: 20\n"));
        assert!(output.contains("Best streak: none\n"));
        assert!(output.contains("Most frequent task: -\n"));
    }

    #[test]
    fn stats_command_json_output() {
        let mut db = Database::open_in_memory().unwrap();
        let user = UserId::new("ana").unwrap();
        record(&mut db, &user, 3, &ProposedEntry::worked(8.0, "api"), None);

        let mut output = Vec::new();
        run(&mut output, &db, &user, 2025, 2, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["complete_days"][0]["date"], "2025-02-03");
        assert_eq!(value["task_counts"]["api"], 1);
        assert_eq!(value["most_dedicated_task"], "api");
    }
}
