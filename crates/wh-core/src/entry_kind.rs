//! Entry kind enum as the single source of truth for entry kind strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a work entry accounts for time on its date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    /// Regular hours counted toward the daily requirement.
    Worked,
    /// Absence justified by an external cause.
    ExternalAbsence,
    /// Hours on top of a completed day.
    ExtraWorked,
}

impl EntryKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Worked, Self::ExternalAbsence, Self::ExtraWorked];

    /// String representation for storage and output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Worked => "worked",
            Self::ExternalAbsence => "external",
            Self::ExtraWorked => "extra",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = UnknownEntryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "worked" => Ok(Self::Worked),
            "external" | "absence" => Ok(Self::ExternalAbsence),
            "extra" => Ok(Self::ExtraWorked),
            _ => Err(UnknownEntryKind(s.to_string())),
        }
    }
}

impl Serialize for EntryKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntryKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown entry kind strings.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown entry kind: {0}")]
pub struct UnknownEntryKind(String);
