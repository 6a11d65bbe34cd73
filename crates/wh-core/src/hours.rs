//! Hour input parsing and display.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// `1h 30m`, `2h`, `45m`, `1.5h`. Commas are normalized to dots first.
static HOURS_MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(\d+(?:\.\d+)?)\s*h)?\s*(?:(\d+(?:\.\d+)?)\s*m)?$")
        .expect("hours regex is valid")
});

/// A bare decimal such as `1.5`.
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("decimal regex is valid"));

/// Errors from [`parse_hours`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HoursParseError {
    #[error("hours cannot be empty")]
    Empty,

    #[error("invalid hours '{input}': use forms like 1h 30m, 2h, 45m or 1.5")]
    Malformed { input: String },

    #[error("minutes must be a whole number, got '{value}'")]
    FractionalMinutes { value: String },
}

/// Parses an hour amount typed by a user into fractional hours.
///
/// Zero is a valid parse result; whether zero hours are acceptable is decided
/// by the admission rules, not here.
pub fn parse_hours(input: &str) -> Result<f64, HoursParseError> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(HoursParseError::Empty);
    }

    if DECIMAL_RE.is_match(&normalized) {
        return normalized.parse().map_err(|_| HoursParseError::Malformed {
            input: input.to_string(),
        });
    }

    let malformed = || HoursParseError::Malformed {
        input: input.to_string(),
    };
    let caps = HOURS_MINUTES_RE.captures(&normalized).ok_or_else(malformed)?;
    let hours_part = caps.get(1);
    let minutes_part = caps.get(2);
    if hours_part.is_none() && minutes_part.is_none() {
        return Err(malformed());
    }

    let hours: f64 = match hours_part {
        Some(m) => m.as_str().parse().map_err(|_| malformed())?,
        None => 0.0,
    };
    let minutes: u32 = match minutes_part {
        Some(m) if m.as_str().contains('.') => {
            return Err(HoursParseError::FractionalMinutes {
                value: m.as_str().to_string(),
            });
        }
        Some(m) => m.as_str().parse().map_err(|_| malformed())?,
        None => 0,
    };

    Ok(hours + f64::from(minutes) / 60.0)
}

/// Formats fractional hours as `Xh Ym`, rounded to whole minutes.
///
/// Drops the zero component: `2h`, `45m`. Zero (or less) renders as `0m`.
#[allow(clippy::cast_possible_truncation)]
pub fn format_hours(hours: f64) -> String {
    if !hours.is_finite() || hours <= 0.0 {
        return "0m".to_string();
    }
    let total_minutes = (hours * 60.0).round() as i64;
    let h = total_minutes / 60;
    let m = total_minutes % 60;
    match (h, m) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
