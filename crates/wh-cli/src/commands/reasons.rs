//! Absence reason catalog commands.

use std::io::Write;

use anyhow::{Result, bail};
use serde_json::json;
use wh_core::UserId;
use wh_db::Database;

pub fn list<W: Write>(writer: &mut W, db: &Database, user: &UserId, json: bool) -> Result<()> {
    let reasons = db.list_reasons(user)?;

    if json {
        let items: Vec<_> = reasons
            .iter()
            .map(|reason| {
                json!({
                    "name": reason.name,
                    "full_day": reason.full_day,
                    "global": reason.is_global(),
                })
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&items)?)?;
        return Ok(());
    }

    if reasons.is_empty() {
        writeln!(writer, "No absence reasons.")?;
        return Ok(());
    }
    for reason in &reasons {
        let span = if reason.full_day { "full day" } else { "partial" };
        let scope = if reason.is_global() { "global" } else { "personal" };
        writeln!(writer, "{:<24}  {span:<8}  {scope}", reason.name)?;
    }
    Ok(())
}

pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: &UserId,
    name: &str,
    full_day: bool,
    global: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("reason name cannot be empty");
    }
    let scope = if global { None } else { Some(user) };
    let reason = db.insert_reason(scope, name, full_day)?;

    let span = if reason.full_day { "full-day" } else { "partial" };
    let owner = if reason.is_global() { "global" } else { "personal" };
    writeln!(writer, "Added {owner} {span} reason \"{}\"", reason.name)?;
    Ok(())
}

/// Renames a personal reason or changes whether it takes the full day.
pub fn edit<W: Write>(
    writer: &mut W,
    db: &mut Database,
    user: &UserId,
    name: &str,
    new_name: Option<&str>,
    full_day: Option<bool>,
) -> Result<()> {
    if new_name.is_none() && full_day.is_none() {
        bail!("nothing to change; pass --rename, --full-day or --partial");
    }
    if new_name.is_some_and(|n| n.trim().is_empty()) {
        bail!("reason name cannot be empty");
    }
    let Some(reason) = db.update_reason(user, name, new_name, full_day)? else {
        bail!("no personal reason named \"{}\"", name.trim());
    };

    let span = if reason.full_day { "full-day" } else { "partial" };
    writeln!(writer, "Updated personal {span} reason \"{}\"", reason.name)?;
    Ok(())
}

pub fn delete<W: Write>(writer: &mut W, db: &mut Database, user: &UserId, name: &str) -> Result<()> {
    if !db.delete_reason(user, name)? {
        bail!("no personal reason named \"{}\"", name.trim());
    }
    writeln!(writer, "Deleted reason \"{}\"", name.trim())?;
    Ok(())
}
