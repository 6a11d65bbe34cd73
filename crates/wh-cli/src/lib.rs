//! Work hours ledger CLI library.
//!
//! This crate provides the `wh` command-line interface over the ledger rules
//! in `wh-core` and the record store in `wh-db`.

mod cli;
pub mod commands;
mod config;

pub use cli::{AddEntry, Cli, Commands, EntryTarget, HolidaysAction, ReasonsAction};
pub use config::Config;
