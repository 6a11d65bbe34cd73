//! CLI subcommand implementations.

pub mod add;
pub mod day;
pub mod delete;
pub mod holidays;
pub mod month;
pub mod reasons;
pub mod stats;
pub mod status;
pub mod util;
