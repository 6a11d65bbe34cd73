//! Status command for showing what the store holds for a user.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use wh_core::UserId;
use wh_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    database_path: &Path,
    user: &UserId,
) -> Result<()> {
    let status = db.status(user)?;

    writeln!(writer, "Work hours status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(writer, "User: {user}")?;

    match (status.first_entry_date, status.last_entry_date) {
        (Some(first), Some(last)) => writeln!(
            writer,
            "Entries: {} ({first} to {last})",
            status.entry_count
        )?,
        _ => writeln!(writer, "No entries recorded.")?,
    }
    writeln!(writer, "Absence reasons: {}", status.reason_count)?;
    writeln!(writer, "Holidays: {}", status.holiday_count)?;

    Ok(())
}
