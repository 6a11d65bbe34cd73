//! Holiday calendar commands.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use wh_core::{Holiday, HolidaySource, UserId};
use wh_db::Database;

pub fn list<W: Write>(
    writer: &mut W,
    db: &Database,
    user: &UserId,
    year: i32,
    json: bool,
) -> Result<()> {
    let (start, end) = year_bounds(year)?;
    let holidays = db.list_holidays(user, start, end)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&holidays)?)?;
        return Ok(());
    }

    if holidays.is_empty() {
        writeln!(writer, "No holidays for {year}. Run `wh holidays sync` to import them.")?;
        return Ok(());
    }
    for holiday in &holidays {
        let scope = if holiday.user_id.is_some() {
            "personal"
        } else {
            "public"
        };
        writeln!(
            writer,
            "{} ({})  {scope:<8}  {}",
            holiday.date,
            holiday.date.format("%a"),
            holiday.reason
        )?;
    }
    Ok(())
}

pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: &UserId,
    date: NaiveDate,
    reason: &str,
) -> Result<()> {
    let reason = reason.trim();
    if reason.is_empty() {
        bail!("holiday reason cannot be empty");
    }
    db.insert_holiday(&Holiday {
        date,
        reason: reason.to_string(),
        user_id: Some(user.clone()),
        source: HolidaySource::Custom,
    })?;
    writeln!(writer, "Added holiday on {date}: {reason}")?;
    Ok(())
}

/// Moves a personal holiday to another date or changes its reason.
pub fn edit<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: &UserId,
    date: NaiveDate,
    new_date: Option<NaiveDate>,
    reason: Option<&str>,
) -> Result<()> {
    if new_date.is_none() && reason.is_none() {
        bail!("nothing to change; pass --date or --reason");
    }
    if reason.is_some_and(|r| r.trim().is_empty()) {
        bail!("holiday reason cannot be empty");
    }
    let Some(holiday) = db.update_holiday(user, date, new_date, reason)? else {
        bail!("no personal holiday on {date}");
    };

    if holiday.date == date {
        writeln!(writer, "Updated holiday on {date}: {}", holiday.reason)?;
    } else {
        writeln!(
            writer,
            "Moved holiday from {date} to {}: {}",
            holiday.date, holiday.reason
        )?;
    }
    Ok(())
}

pub fn delete<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: &UserId,
    date: NaiveDate,
) -> Result<()> {
    if !db.delete_holiday(user, date)? {
        bail!("no personal holiday on {date}");
    }
    writeln!(writer, "Deleted holiday on {date}")?;
    Ok(())
}

/// Replaces the public holidays of `year` with the ones the API returns.
pub async fn sync<W: Write>(
    writer: &mut W,
    db: &mut Database,
    client: &wh_holidays::Client,
    year: i32,
) -> Result<()> {
    let holidays = client
        .fetch_holidays(year)
        .await
        .with_context(|| format!("failed to fetch holidays from {}", client.year_url(year)))?;
    let stored = db.replace_synced_holidays(year, &holidays)?;
    writeln!(writer, "Synced {stored} public holidays for {year}")?;
    Ok(())
}

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    start.zip(end).with_context(|| format!("invalid year {year}"))
}
