//! Shared utilities for CLI commands.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate};
use wh_core::{HolidayCalendar, UserId, month_bounds, parse_hours};
use wh_db::Database;

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a `YYYY-MM-DD` date, or returns `default` when none is given.
pub fn parse_date(input: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    let Some(input) = input else {
        return Ok(default);
    };
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date: {input}. Use YYYY-MM-DD (e.g., 2025-06-02)"))
}

/// Parses a `YYYY-MM` month, or returns the month of `default`.
pub fn parse_month(input: Option<&str>, default: NaiveDate) -> Result<(i32, u32)> {
    let Some(input) = input else {
        return Ok((default.year(), default.month()));
    };
    let invalid = || format!("invalid month: {input}. Use YYYY-MM (e.g., 2025-06)");

    let (year, month) = input.trim().split_once('-').with_context(invalid)?;
    let year: i32 = year.parse().with_context(invalid)?;
    let month: u32 = month.parse().with_context(invalid)?;
    if month_bounds(year, month).is_none() {
        bail!(invalid());
    }
    Ok((year, month))
}

/// Parses an hours argument such as `1h 30m`.
pub fn parse_hours_arg(input: &str) -> Result<f64> {
    parse_hours(input).with_context(|| format!("invalid hours: {input}"))
}

/// Builds the calendar of public and the user's holidays for one month.
pub fn month_calendar(
    db: &Database,
    user: &UserId,
    year: i32,
    month: u32,
) -> Result<HolidayCalendar> {
    let (start, end) =
        month_bounds(year, month).with_context(|| format!("invalid month {year}-{month:02}"))?;
    let holidays = db.list_holidays(user, start, end)?;
    Ok(HolidayCalendar::from_holidays(&holidays))
}
