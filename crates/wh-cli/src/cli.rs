//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Work hours ledger.
///
/// Records worked, extra and absence hours against calendar days and reports
/// monthly progress against the laborable-day requirement.
#[derive(Debug, Parser)]
#[command(name = "wh", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// User whose records are read and written.
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show what the store holds for the current user.
    Status,

    /// Record hours on a day.
    Add {
        #[command(subcommand)]
        entry: AddEntry,
    },

    /// Delete an entry by ID.
    Delete {
        /// Entry ID, as shown by `wh day`.
        id: String,
    },

    /// Show the entries and totals of one day.
    Day {
        /// Date as YYYY-MM-DD (defaults to today).
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the monthly summary.
    Month {
        /// Month as YYYY-MM (defaults to the current month).
        #[arg(long)]
        month: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show monthly statistics.
    Stats {
        /// Month as YYYY-MM (defaults to the current month).
        #[arg(long)]
        month: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage absence reasons.
    #[command(subcommand)]
    Reasons(ReasonsAction),

    /// Manage holidays.
    #[command(subcommand)]
    Holidays(HolidaysAction),
}

/// Options shared by every `add` variant.
#[derive(Debug, Clone, Args)]
pub struct EntryTarget {
    /// Date as YYYY-MM-DD (defaults to today).
    #[arg(long)]
    pub date: Option<String>,

    /// Confirm recording on a weekend.
    #[arg(short, long)]
    pub yes: bool,

    /// Record even if the previous laborable day is incomplete.
    #[arg(long)]
    pub force: bool,
}

/// Kinds of entry that can be added.
#[derive(Debug, Subcommand)]
pub enum AddEntry {
    /// Hours worked toward the daily requirement.
    Worked {
        /// Hours, e.g. "1h 30m", "2h", "45m" or "1.5".
        #[arg(long)]
        hours: String,

        /// What the time was spent on.
        #[arg(short, long)]
        description: String,

        #[command(flatten)]
        target: EntryTarget,
    },

    /// Hours beyond a complete day.
    Extra {
        /// Hours, e.g. "1h 30m", "2h", "45m" or "1.5".
        #[arg(long)]
        hours: String,

        /// What the time was spent on.
        #[arg(short, long)]
        description: String,

        #[command(flatten)]
        target: EntryTarget,
    },

    /// Time away for an external cause.
    Absence {
        /// Cause name; unknown names are saved as a new personal reason.
        #[arg(long)]
        cause: String,

        /// Hours absent. Not used when the cause is full-day.
        #[arg(long)]
        hours: Option<String>,

        /// Save a new cause as a full-day reason.
        #[arg(long, conflicts_with = "partial")]
        full_day: bool,

        /// Save a new cause as a partial-day reason.
        #[arg(long)]
        partial: bool,

        #[command(flatten)]
        target: EntryTarget,
    },
}

/// Absence reason catalog actions.
#[derive(Debug, Subcommand)]
pub enum ReasonsAction {
    /// List global and personal reasons.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a reason.
    Add {
        /// Reason name.
        name: String,

        /// Absences for this reason take a number of hours instead of the full day.
        #[arg(long)]
        partial: bool,

        /// Make the reason available to every user.
        #[arg(long)]
        global: bool,
    },

    /// Edit one of your personal reasons.
    Edit {
        /// Current name (case and accents are ignored).
        name: String,

        /// New name.
        #[arg(long)]
        rename: Option<String>,

        /// Absences for this reason take the full day.
        #[arg(long, conflicts_with = "partial")]
        full_day: bool,

        /// Absences for this reason take a number of hours.
        #[arg(long)]
        partial: bool,
    },

    /// Delete one of your personal reasons.
    Delete {
        /// Reason name (case and accents are ignored).
        name: String,
    },
}

/// Holiday calendar actions.
#[derive(Debug, Subcommand)]
pub enum HolidaysAction {
    /// List public and personal holidays of a year.
    List {
        /// Year (defaults to the current year).
        #[arg(long)]
        year: Option<i32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a personal holiday.
    Add {
        /// Date as YYYY-MM-DD.
        date: String,

        /// Why the day is not laborable.
        reason: String,
    },

    /// Move or rename a personal holiday.
    Edit {
        /// Current date as YYYY-MM-DD.
        date: String,

        /// New date as YYYY-MM-DD.
        #[arg(long = "date", value_name = "NEW_DATE")]
        new_date: Option<String>,

        /// New reason.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Delete a personal holiday.
    Delete {
        /// Date as YYYY-MM-DD.
        date: String,
    },

    /// Import the public holidays of a year from the holiday API.
    Sync {
        /// Year (defaults to the current year).
        #[arg(long)]
        year: Option<i32>,
    },
}
