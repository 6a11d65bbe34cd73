//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Invalid holiday source value.
    #[error("invalid holiday source: {value}")]
    InvalidHolidaySource { value: String },
}

/// Where a holiday came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidaySource {
    /// Imported from the public holiday calendar.
    Sync,
    /// Added by hand.
    Custom,
}

impl HolidaySource {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for HolidaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HolidaySource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sync" => Ok(Self::Sync),
            "custom" => Ok(Self::Custom),
            _ => Err(ValidationError::InvalidHolidaySource {
                value: s.to_string(),
            }),
        }
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            ///
            /// Surrounding whitespace is trimmed before the emptiness check.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated work entry identifier.
    ///
    /// Entry IDs are assigned by the record store when an entry is inserted.
    EntryId, "entry ID"
);

define_string_id!(
    /// A validated user identifier.
    ///
    /// Every store call is scoped to one user; there is no ambient current user.
    UserId, "user ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_rejects_empty() {
        assert!(EntryId::new("").is_err());
        assert!(EntryId::new("   ").is_err());
        assert!(EntryId::new("valid-id").is_ok());
    }

    #[test]
    fn user_id_is_trimmed() {
        let id = UserId::new("  ana  ").unwrap();
        assert_eq!(id.as_str(), "ana");
    }

    #[test]
    fn user_id_serde_roundtrip() {
        let id = UserId::new("user-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user-123\"");
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn entry_id_serde_rejects_empty() {
        let result: Result<EntryId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn empty_error_names_field() {
        let err = UserId::new("").unwrap_err();
        assert_eq!(err.to_string(), "user ID cannot be empty");
    }

    #[test]
    fn holiday_source_from_str() {
        assert_eq!(
            "sync".parse::<HolidaySource>().unwrap(),
            HolidaySource::Sync
        );
        assert_eq!(
            "custom".parse::<HolidaySource>().unwrap(),
            HolidaySource::Custom
        );
        assert!("other".parse::<HolidaySource>().is_err());
    }

    #[test]
    fn holiday_source_serializes_lowercase() {
        let json = serde_json::to_string(&HolidaySource::Custom).unwrap();
        assert_eq!(json, "\"custom\"");
    }
}
