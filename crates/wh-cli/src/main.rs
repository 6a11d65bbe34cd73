use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wh_cli::commands::add::{AddRequest, GateOverrides};
use wh_cli::commands::{add, day, delete, holidays, month, reasons, stats, status, util};
use wh_cli::{AddEntry, Cli, Commands, Config, HolidaysAction, ReasonsAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(wh_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = wh_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

/// Turns `wh add ...` arguments into a request and gate overrides.
fn add_request(entry: &AddEntry) -> Result<(AddRequest, Option<&str>, GateOverrides)> {
    let (request, target) = match entry {
        AddEntry::Worked {
            hours,
            description,
            target,
        } => (
            AddRequest::Worked {
                hours: util::parse_hours_arg(hours)?,
                description: description.clone(),
            },
            target,
        ),
        AddEntry::Extra {
            hours,
            description,
            target,
        } => (
            AddRequest::Extra {
                hours: util::parse_hours_arg(hours)?,
                description: description.clone(),
            },
            target,
        ),
        AddEntry::Absence {
            cause,
            hours,
            full_day,
            partial,
            target,
        } => (
            AddRequest::Absence {
                cause: cause.clone(),
                hours: hours.as_deref().map(util::parse_hours_arg).transpose()?,
                full_day: span_flag(*full_day, *partial),
            },
            target,
        ),
    };
    let overrides = GateOverrides {
        yes: target.yes,
        force: target.force,
    };
    Ok((request, target.date.as_deref(), overrides))
}

/// `--full-day` / `--partial` as an optional override.
const fn span_flag(full_day: bool, partial: bool) -> Option<bool> {
    if full_day {
        Some(true)
    } else if partial {
        Some(false)
    } else {
        None
    }
}

#[expect(
    clippy::too_many_lines,
    reason = "CLI command dispatch is inherently verbose"
)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut out = std::io::stdout();
    let today = util::today();

    match &cli.command {
        Some(Commands::Status) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            status::run(&mut out, &db, &config.database_path, &user)?;
        }
        Some(Commands::Add { entry }) => {
            let (request, date, overrides) = add_request(entry)?;
            let date = util::parse_date(date, today)?;
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            add::run(
                &mut out,
                &mut db,
                &user,
                &config.policy(),
                date,
                &request,
                overrides,
            )?;
        }
        Some(Commands::Delete { id }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            delete::run(&mut out, &mut db, &user, id)?;
        }
        Some(Commands::Day { date, json }) => {
            let date = util::parse_date(date.as_deref(), today)?;
            let (db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            day::run(&mut out, &db, &user, date, *json)?;
        }
        Some(Commands::Month { month: target, json }) => {
            let (year, month) = util::parse_month(target.as_deref(), today)?;
            let (db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            month::run(&mut out, &db, &user, year, month, *json)?;
        }
        Some(Commands::Stats { month: target, json }) => {
            let (year, month) = util::parse_month(target.as_deref(), today)?;
            let (db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            stats::run(&mut out, &db, &user, year, month, *json)?;
        }
        Some(Commands::Reasons(action)) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            match action {
                ReasonsAction::List { json } => reasons::list(&mut out, &db, &user, *json)?,
                ReasonsAction::Add {
                    name,
                    partial,
                    global,
                } => reasons::add(&mut out, &mut db, &user, name, !*partial, *global)?,
                ReasonsAction::Edit {
                    name,
                    rename,
                    full_day,
                    partial,
                } => {
                    let full_day = span_flag(*full_day, *partial);
                    reasons::edit(&mut out, &mut db, &user, name, rename.as_deref(), full_day)?;
                }
                ReasonsAction::Delete { name } => {
                    reasons::delete(&mut out, &mut db, &user, name)?;
                }
            }
        }
        Some(Commands::Holidays(action)) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let user = config.resolve_user(cli.user.as_deref())?;
            match action {
                HolidaysAction::List { year, json } => {
                    let year = year.unwrap_or_else(|| today.year());
                    holidays::list(&mut out, &db, &user, year, *json)?;
                }
                HolidaysAction::Add { date, reason } => {
                    let date = util::parse_date(Some(date.as_str()), today)?;
                    holidays::add(&mut out, &mut db, &user, date, reason)?;
                }
                HolidaysAction::Edit {
                    date,
                    new_date,
                    reason,
                } => {
                    let date = util::parse_date(Some(date.as_str()), today)?;
                    let new_date = new_date
                        .as_deref()
                        .map(|d| util::parse_date(Some(d), today))
                        .transpose()?;
                    holidays::edit(&mut out, &mut db, &user, date, new_date, reason.as_deref())?;
                }
                HolidaysAction::Delete { date } => {
                    let date = util::parse_date(Some(date.as_str()), today)?;
                    holidays::delete(&mut out, &mut db, &user, date)?;
                }
                HolidaysAction::Sync { year } => {
                    let year = year.unwrap_or_else(|| today.year());
                    let client = wh_holidays::Client::new(config.holidays_api_url.as_str())
                        .context("failed to create holiday client")?;
                    let runtime = tokio::runtime::Runtime::new()
                        .context("failed to initialize tokio runtime")?;
                    runtime.block_on(holidays::sync(&mut out, &mut db, &client, year))?;
                }
            }
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
