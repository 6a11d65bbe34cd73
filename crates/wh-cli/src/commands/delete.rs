//! Delete command for removing one of the user's entries.

use std::io::Write;

use anyhow::{Context, Result, bail};
use wh_core::{EntryId, UserId, format_hours};
use wh_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &mut Database, user: &UserId, id: &str) -> Result<()> {
    let id = EntryId::new(id).context("invalid entry ID")?;
    let Some(entry) = db.get_entry(user, &id)? else {
        bail!("no entry {id} for user {user}");
    };

    db.delete_entry(user, &id)?;
    tracing::debug!(%id, date = %entry.date, "entry deleted");

    let amount = if entry.is_full_day_absence() {
        "full day".to_string()
    } else {
        format_hours(entry.hours)
    };
    writeln!(
        writer,
        "Deleted {} entry on {}: {amount} {}",
        entry.kind, entry.date, entry.description
    )?;
    Ok(())
}
