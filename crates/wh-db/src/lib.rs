//! Storage layer for the work hours ledger.
//!
//! Provides persistence for entries, absence reasons and holidays using
//! `rusqlite`. Every query that touches user data takes an explicit
//! [`UserId`]; there is no notion of a current user at this level.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Dates and Timestamps
//!
//! Calendar dates are stored as TEXT `YYYY-MM-DD`, so lexicographic ordering
//! matches chronological ordering and range queries work on the raw column.
//! `created_at` is an RFC 3339 UTC timestamp with millisecond precision.
//!
//! ## Scopes
//!
//! Absence reasons and holidays have a nullable `user_id`. `NULL` means the
//! row is global (a shared reason, or a public holiday) and visible to every
//! user; otherwise the row belongs to that user only.
//!
//! ## Reason Names
//!
//! `absence_reasons.name_key` holds the name folded with
//! [`wh_core::normalize_key`]. Lookups, uniqueness and deletes go through the
//! key, so "Médico", "MÉDICO" and "medico" name the same reason.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;
use wh_core::{
    AbsenceReason, AdmittedEntry, EntryId, EntryKind, Holiday, HolidaySource, UserId, WorkEntry,
    normalize_key,
};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to parse a stored entry timestamp.
    #[error("invalid timestamp for entry {entry_id}: {timestamp}")]
    TimestampParse {
        entry_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Failed to parse a stored calendar date.
    #[error("invalid date in {table} row {row}: {value}")]
    DateParse {
        table: &'static str,
        row: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A stored row holds a value the domain types reject.
    #[error("invalid {table} row {row}: {message}")]
    InvalidRow {
        table: &'static str,
        row: String,
        message: String,
    },

    #[error("absence reason '{name}' already exists")]
    DuplicateReason { name: String },

    /// The name has no letters or digits left after folding.
    #[error("invalid absence reason name '{name}'")]
    InvalidReasonName { name: String },

    #[error("a holiday already exists on {date}")]
    DuplicateHoliday { date: NaiveDate },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// A stored absence reason with its scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonRecord {
    pub id: i64,

    /// `None` for global reasons.
    pub user_id: Option<UserId>,
    pub name: String,
    pub full_day: bool,
}

impl ReasonRecord {
    /// The reason as the admission rules see it.
    pub fn to_reason(&self) -> AbsenceReason {
        AbsenceReason::new(self.name.clone(), self.full_day)
    }

    pub const fn is_global(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Per-user store summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbStatus {
    pub entry_count: i64,
    pub first_entry_date: Option<NaiveDate>,
    pub last_entry_date: Option<NaiveDate>,

    /// Global plus user-scoped reasons.
    pub reason_count: i64,

    /// Public plus the user's custom holidays.
    pub holiday_count: i64,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.init()?;
        debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&mut self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            -- Entries: one row per recorded block of time
            -- date: 'YYYY-MM-DD'
            -- kind: 'worked', 'external' or 'extra'
            -- hours: 0 on an external entry means a full-day absence
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                kind TEXT NOT NULL,
                hours REAL NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_user_date ON entries(user_id, date);

            -- name_key: the folded name used for matching
            CREATE TABLE IF NOT EXISTS absence_reasons (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT,
                name TEXT NOT NULL,
                full_day INTEGER NOT NULL DEFAULT 1,
                name_key TEXT NOT NULL DEFAULT ''
            );

            -- Holidays: user_id NULL for public holidays
            -- source: 'sync' or 'custom'
            CREATE TABLE IF NOT EXISTS holidays (
                date TEXT NOT NULL,
                user_id TEXT,
                reason TEXT NOT NULL,
                source TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_holidays_date_scope
                ON holidays(date, COALESCE(user_id, ''));
            ",
        )?;
        self.migrate_reason_keys()?;
        self.conn.execute_batch(
            "
            CREATE UNIQUE INDEX IF NOT EXISTS idx_absence_reasons_scope_key
                ON absence_reasons(COALESCE(user_id, ''), name_key);
            ",
        )?;
        Ok(())
    }

    /// Fills `name_key` on stores created before reasons were matched on
    /// folded names.
    ///
    /// Reasons whose key collides with an older one in the same scope are
    /// dropped. Entries keep the cause name they were recorded with.
    fn migrate_reason_keys(&mut self) -> Result<(), DbError> {
        let has_key: bool = self.conn.query_row(
            "
            SELECT EXISTS(
                SELECT 1 FROM pragma_table_info('absence_reasons') WHERE name = 'name_key'
            )
            ",
            [],
            |row| row.get(0),
        )?;
        let pending: bool = if has_key {
            self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM absence_reasons WHERE name_key = '')",
                [],
                |row| row.get(0),
            )?
        } else {
            true
        };
        if !pending {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        tx.execute_batch("DROP INDEX IF EXISTS idx_absence_reasons_scope_name;")?;
        if !has_key {
            tx.execute_batch(
                "ALTER TABLE absence_reasons ADD COLUMN name_key TEXT NOT NULL DEFAULT '';",
            )?;
        }
        let rows: Vec<(i64, Option<String>, String)> = {
            let mut stmt = tx.prepare("SELECT id, user_id, name FROM absence_reasons ORDER BY id")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
            rows.collect::<Result<_, _>>()?
        };

        let mut seen = HashSet::new();
        for (id, user_id, name) in rows {
            let key = normalize_key(&name);
            if key.is_empty() || !seen.insert((user_id, key.clone())) {
                warn!(id, %name, "dropping absence reason that folds onto another");
                tx.execute("DELETE FROM absence_reasons WHERE id = ?", params![id])?;
                continue;
            }
            tx.execute(
                "UPDATE absence_reasons SET name_key = ? WHERE id = ?",
                params![key, id],
            )?;
        }
        tx.commit()?;
        debug!("migrated absence reason keys");
        Ok(())
    }

    // ========== Entries ==========

    /// Stores an admitted entry for `user` on `date`.
    ///
    /// The store assigns the ID and creation time.
    pub fn insert_entry(
        &mut self,
        user: &UserId,
        date: NaiveDate,
        entry: &AdmittedEntry,
    ) -> Result<WorkEntry, DbError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        self.conn.execute(
            "
            INSERT INTO entries (id, user_id, date, kind, hours, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                id,
                user.as_str(),
                format_date(date),
                entry.kind.as_str(),
                entry.hours,
                entry.description,
                format_timestamp(created_at),
            ],
        )?;
        debug!(%id, %date, kind = %entry.kind, hours = entry.hours, "inserted entry");

        Ok(WorkEntry {
            id: to_entry_id(id)?,
            user_id: user.clone(),
            date,
            kind: entry.kind,
            hours: entry.hours,
            description: entry.description.clone(),
            created_at,
        })
    }

    /// Lists a user's entries on one date, oldest first.
    pub fn entries_for_date(
        &self,
        user: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<WorkEntry>, DbError> {
        self.entries_in_range(user, date, date)
    }

    /// Lists a user's entries between two dates, inclusive on both ends.
    pub fn entries_in_range(
        &self,
        user: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkEntry>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, user_id, date, kind, hours, description, created_at
            FROM entries
            WHERE user_id = ? AND date >= ? AND date <= ?
            ORDER BY date ASC, created_at ASC, rowid ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![user.as_str(), format_date(start), format_date(end)],
            EntryRow::from_row,
        )?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }

    /// Looks up one of the user's entries.
    pub fn get_entry(&self, user: &UserId, id: &EntryId) -> Result<Option<WorkEntry>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT id, user_id, date, kind, hours, description, created_at
                FROM entries
                WHERE user_id = ? AND id = ?
                ",
                params![user.as_str(), id.as_str()],
                EntryRow::from_row,
            )
            .optional()?;
        row.map(EntryRow::into_entry).transpose()
    }

    /// Deletes one of the user's entries. Returns false if no such entry exists.
    pub fn delete_entry(&mut self, user: &UserId, id: &EntryId) -> Result<bool, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM entries WHERE user_id = ? AND id = ?",
            params![user.as_str(), id.as_str()],
        )?;
        Ok(deleted > 0)
    }

    // ========== Absence reasons ==========

    /// Lists the reasons visible to `user`: global ones and the user's own,
    /// ordered by name.
    pub fn list_reasons(&self, user: &UserId) -> Result<Vec<ReasonRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, user_id, name, full_day
            FROM absence_reasons
            WHERE user_id IS NULL OR user_id = ?
            ORDER BY name_key ASC, user_id IS NULL ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(params![user.as_str()], ReasonRow::from_row)?;
        let mut reasons = Vec::new();
        for row in rows {
            reasons.push(row?.into_record()?);
        }
        Ok(reasons)
    }

    /// Finds a reason visible to `user` by its folded name.
    ///
    /// A user-scoped reason shadows a global one with the same name.
    pub fn find_reason(&self, user: &UserId, name: &str) -> Result<Option<ReasonRecord>, DbError> {
        let key = normalize_key(name);
        if key.is_empty() {
            return Ok(None);
        }
        let row = self
            .conn
            .query_row(
                "
                SELECT id, user_id, name, full_day
                FROM absence_reasons
                WHERE (user_id IS NULL OR user_id = ?) AND name_key = ?
                ORDER BY user_id IS NULL ASC
                LIMIT 1
                ",
                params![user.as_str(), key],
                ReasonRow::from_row,
            )
            .optional()?;
        row.map(ReasonRow::into_record).transpose()
    }

    /// Stores a new reason, global when `user` is `None`.
    ///
    /// Names are unique per scope once folded, so "MÉDICO" collides with
    /// "Médico".
    pub fn insert_reason(
        &mut self,
        user: Option<&UserId>,
        name: &str,
        full_day: bool,
    ) -> Result<ReasonRecord, DbError> {
        let name = name.trim();
        let key = reason_key(name)?;
        let user_id = user.map(UserId::as_str);

        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "
            SELECT EXISTS(
                SELECT 1 FROM absence_reasons
                WHERE COALESCE(user_id, '') = COALESCE(?, '') AND name_key = ?
            )
            ",
            params![user_id, key],
            |row| row.get(0),
        )?;
        if exists {
            return Err(DbError::DuplicateReason {
                name: name.to_string(),
            });
        }
        tx.execute(
            "INSERT INTO absence_reasons (user_id, name, full_day, name_key) VALUES (?, ?, ?, ?)",
            params![user_id, name, full_day, key],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!(id, name, full_day, global = user.is_none(), "inserted absence reason");

        Ok(ReasonRecord {
            id,
            user_id: user.cloned(),
            name: name.to_string(),
            full_day,
        })
    }

    /// Edits one of the user's own reasons in place.
    ///
    /// Returns `None` when the user has no personal reason with that name.
    /// A rename must not collide with another reason in the same scope.
    /// Existing entries keep the cause name they were recorded with.
    pub fn update_reason(
        &mut self,
        user: &UserId,
        name: &str,
        new_name: Option<&str>,
        full_day: Option<bool>,
    ) -> Result<Option<ReasonRecord>, DbError> {
        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(
                "
                SELECT id, user_id, name, full_day
                FROM absence_reasons
                WHERE user_id = ? AND name_key = ?
                ",
                params![user.as_str(), normalize_key(name)],
                ReasonRow::from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let name = new_name.map_or_else(|| current.name.clone(), |n| n.trim().to_string());
        let key = reason_key(&name)?;
        let taken: bool = tx.query_row(
            "
            SELECT EXISTS(
                SELECT 1 FROM absence_reasons
                WHERE user_id = ? AND name_key = ? AND id != ?
            )
            ",
            params![user.as_str(), key, current.id],
            |row| row.get(0),
        )?;
        if taken {
            return Err(DbError::DuplicateReason { name });
        }

        let full_day = full_day.unwrap_or(current.full_day);
        tx.execute(
            "UPDATE absence_reasons SET name = ?, name_key = ?, full_day = ? WHERE id = ?",
            params![name, key, full_day, current.id],
        )?;
        tx.commit()?;
        debug!(id = current.id, from = %current.name, to = %name, full_day, "updated absence reason");

        Ok(Some(ReasonRecord {
            id: current.id,
            user_id: Some(user.clone()),
            name,
            full_day,
        }))
    }

    /// Deletes one of the user's own reasons by its folded name.
    ///
    /// Global reasons are never deleted through this call. Existing entries
    /// keep the cause name they were recorded with.
    pub fn delete_reason(&mut self, user: &UserId, name: &str) -> Result<bool, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM absence_reasons WHERE user_id = ? AND name_key = ?",
            params![user.as_str(), normalize_key(name)],
        )?;
        Ok(deleted > 0)
    }

    // ========== Holidays ==========

    /// Stores a holiday. Public holidays have no `user_id`.
    pub fn insert_holiday(&mut self, holiday: &Holiday) -> Result<(), DbError> {
        let user_id = holiday.user_id.as_ref().map(UserId::as_str);
        let tx = self.conn.transaction()?;
        let exists: bool = tx.query_row(
            "
            SELECT EXISTS(
                SELECT 1 FROM holidays
                WHERE date = ? AND COALESCE(user_id, '') = COALESCE(?, '')
            )
            ",
            params![format_date(holiday.date), user_id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(DbError::DuplicateHoliday { date: holiday.date });
        }
        tx.execute(
            "INSERT INTO holidays (date, user_id, reason, source) VALUES (?, ?, ?, ?)",
            params![
                format_date(holiday.date),
                user_id,
                holiday.reason,
                holiday.source.as_str(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Lists holidays visible to `user` between two dates, inclusive.
    ///
    /// When a public and a custom holiday share a date, both are returned,
    /// public first.
    pub fn list_holidays(
        &self,
        user: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Holiday>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT date, user_id, reason, source
            FROM holidays
            WHERE (user_id IS NULL OR user_id = ?) AND date >= ? AND date <= ?
            ORDER BY date ASC, user_id IS NOT NULL ASC
            ",
        )?;
        let rows = stmt.query_map(
            params![user.as_str(), format_date(start), format_date(end)],
            HolidayRow::from_row,
        )?;
        let mut holidays = Vec::new();
        for row in rows {
            holidays.push(row?.into_holiday()?);
        }
        Ok(holidays)
    }

    /// Deletes the user's custom holiday on `date`. Public holidays are
    /// managed only through [`Database::replace_synced_holidays`].
    pub fn delete_holiday(&mut self, user: &UserId, date: NaiveDate) -> Result<bool, DbError> {
        let deleted = self.conn.execute(
            "DELETE FROM holidays WHERE user_id = ? AND date = ?",
            params![user.as_str(), format_date(date)],
        )?;
        Ok(deleted > 0)
    }

    /// Moves or renames the user's custom holiday on `date`.
    ///
    /// Returns `None` when the user has no custom holiday on `date`. Moving
    /// onto a date that already holds one of the user's holidays fails;
    /// sharing a date with a public holiday is allowed.
    pub fn update_holiday(
        &mut self,
        user: &UserId,
        date: NaiveDate,
        new_date: Option<NaiveDate>,
        reason: Option<&str>,
    ) -> Result<Option<Holiday>, DbError> {
        let tx = self.conn.transaction()?;
        let current: Option<String> = tx
            .query_row(
                "SELECT reason FROM holidays WHERE user_id = ? AND date = ?",
                params![user.as_str(), format_date(date)],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };

        let target = new_date.unwrap_or(date);
        if target != date {
            let taken: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM holidays WHERE user_id = ? AND date = ?)",
                params![user.as_str(), format_date(target)],
                |row| row.get(0),
            )?;
            if taken {
                return Err(DbError::DuplicateHoliday { date: target });
            }
        }

        let reason = reason.map_or(current, |r| r.trim().to_string());
        tx.execute(
            "UPDATE holidays SET date = ?, reason = ? WHERE user_id = ? AND date = ?",
            params![
                format_date(target),
                reason,
                user.as_str(),
                format_date(date)
            ],
        )?;
        tx.commit()?;
        debug!(from = %date, to = %target, "updated holiday");

        Ok(Some(Holiday {
            date: target,
            reason,
            user_id: Some(user.clone()),
            source: HolidaySource::Custom,
        }))
    }

    /// Replaces all synced holidays of `year` with `holidays`.
    ///
    /// Runs in one transaction. Holidays outside `year` and duplicate dates
    /// are skipped. Returns the number stored.
    pub fn replace_synced_holidays(
        &mut self,
        year: i32,
        holidays: &[Holiday],
    ) -> Result<usize, DbError> {
        let year_prefix = format!("{year:04}-%");
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM holidays WHERE source = ? AND user_id IS NULL AND date LIKE ?",
            params![HolidaySource::Sync.as_str(), year_prefix],
        )?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO holidays (date, user_id, reason, source)
                VALUES (?, NULL, ?, ?)
                ",
            )?;
            for holiday in holidays.iter().filter(|h| h.date.year() == year) {
                inserted += stmt.execute(params![
                    format_date(holiday.date),
                    holiday.reason,
                    HolidaySource::Sync.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        debug!(year, removed, inserted, "replaced synced holidays");
        Ok(inserted)
    }

    // ========== Status ==========

    /// Summarizes what the store holds for `user`.
    pub fn status(&self, user: &UserId) -> Result<DbStatus, DbError> {
        let (entry_count, first, last): (i64, Option<String>, Option<String>) =
            self.conn.query_row(
                "SELECT COUNT(*), MIN(date), MAX(date) FROM entries WHERE user_id = ?",
                params![user.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?;
        let reason_count = self.conn.query_row(
            "SELECT COUNT(*) FROM absence_reasons WHERE user_id IS NULL OR user_id = ?",
            params![user.as_str()],
            |row| row.get(0),
        )?;
        let holiday_count = self.conn.query_row(
            "SELECT COUNT(*) FROM holidays WHERE user_id IS NULL OR user_id = ?",
            params![user.as_str()],
            |row| row.get(0),
        )?;

        Ok(DbStatus {
            entry_count,
            first_entry_date: first
                .map(|d| parse_date(&d, "entries", "min"))
                .transpose()?,
            last_entry_date: last
                .map(|d| parse_date(&d, "entries", "max"))
                .transpose()?,
            reason_count,
            holiday_count,
        })
    }
}

struct EntryRow {
    id: String,
    user_id: String,
    date: String,
    kind: String,
    hours: f64,
    description: String,
    created_at: String,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: row.get(2)?,
            kind: row.get(3)?,
            hours: row.get(4)?,
            description: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_entry(self) -> Result<WorkEntry, DbError> {
        let date = parse_date(&self.date, "entries", &self.id)?;
        let created_at = parse_timestamp(&self.created_at, &self.id)?;
        let kind: EntryKind = self.kind.parse().map_err(|e: wh_core::UnknownEntryKind| {
            invalid_row("entries", &self.id, e.to_string())
        })?;
        let user_id = UserId::new(self.user_id)
            .map_err(|e| invalid_row("entries", &self.id, e.to_string()))?;
        Ok(WorkEntry {
            id: to_entry_id(self.id)?,
            user_id,
            date,
            kind,
            hours: self.hours,
            description: self.description,
            created_at,
        })
    }
}

struct ReasonRow {
    id: i64,
    user_id: Option<String>,
    name: String,
    full_day: bool,
}

impl ReasonRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            full_day: row.get(3)?,
        })
    }

    fn into_record(self) -> Result<ReasonRecord, DbError> {
        let user_id = self
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| invalid_row("absence_reasons", &self.id.to_string(), e.to_string()))?;
        Ok(ReasonRecord {
            id: self.id,
            user_id,
            name: self.name,
            full_day: self.full_day,
        })
    }
}

struct HolidayRow {
    date: String,
    user_id: Option<String>,
    reason: String,
    source: String,
}

impl HolidayRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            user_id: row.get(1)?,
            reason: row.get(2)?,
            source: row.get(3)?,
        })
    }

    fn into_holiday(self) -> Result<Holiday, DbError> {
        let date = parse_date(&self.date, "holidays", &self.date)?;
        let source: HolidaySource = self
            .source
            .parse()
            .map_err(|e: wh_core::ValidationError| invalid_row("holidays", &self.date, e.to_string()))?;
        let user_id = self
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| invalid_row("holidays", &self.date, e.to_string()))?;
        Ok(Holiday {
            date,
            reason: self.reason,
            user_id,
            source,
        })
    }
}

fn reason_key(name: &str) -> Result<String, DbError> {
    let key = normalize_key(name);
    if key.is_empty() {
        return Err(DbError::InvalidReasonName {
            name: name.to_string(),
        });
    }
    Ok(key)
}

fn to_entry_id(id: String) -> Result<EntryId, DbError> {
    EntryId::new(id).map_err(|e| invalid_row("entries", "", e.to_string()))
}

fn invalid_row(table: &'static str, row: &str, message: String) -> DbError {
    DbError::InvalidRow {
        table,
        row: row.to_string(),
        message,
    }
}

fn parse_date(value: &str, table: &'static str, row: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| DbError::DateParse {
        table,
        row: row.to_string(),
        value: value.to_string(),
        source,
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_timestamp(timestamp: &str, entry_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            entry_id: entry_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
