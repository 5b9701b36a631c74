//! Error types.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::feasts::SUPPORTED_YEARS;

/// Errors raised at the calendar boundary.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CalendarError {
    /// The input does not name an existing Gregorian day.
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    /// The Easter computus is only validated for [`SUPPORTED_YEARS`].
    #[error(
        "year {0} is outside the supported range {}..={}",
        SUPPORTED_YEARS.start(),
        SUPPORTED_YEARS.end()
    )]
    UnsupportedYear(i32),
}

/// A well-formed reference names text that the corpus does not have.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{missing} not found for `{reference}`")]
pub struct MissingVerseError {
    /// The offending reference, normalised.
    pub reference: String,
    pub missing: Missing,
}

impl Serialize for MissingVerseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("MissingVerseError", 2)?;
        s.serialize_field("reference", &self.reference)?;
        s.serialize_field("message", &self.to_string())?;
        s.end()
    }
}

/// What part of a reference was absent.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Missing {
    Book(String),
    Chapter(u32),
    Verse { chapter: u32, verse: u32 },
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Book(book) => write!(f, "book `{book}`"),
            Missing::Chapter(chapter) => write!(f, "chapter {chapter}"),
            Missing::Verse { chapter, verse } => write!(f, "verse {chapter}:{verse}"),
        }
    }
}

/// Errors loading the external data tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),
    /// A day of the lectionary points at a reading id that is not defined.
    #[error("{month}/{day} refers to unknown reading id {id}")]
    UnknownReading { month: usize, day: usize, id: u32 },
    #[error("no day {month:02}-{day:02} in the Gregorian calendar")]
    InvalidDay { month: u32, day: u32 },
    #[error("`{0}` is not a Coptic day such as `6 Toba`")]
    InvalidKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            "year 1850 is outside the supported range 1900..=2199",
            CalendarError::UnsupportedYear(1850).to_string()
        );
        let err = CalendarError::InvalidDate("2025-02-30".into());
        assert_eq!("invalid date `2025-02-30`", err.to_string());
        let err = MissingVerseError {
            reference: "John 3:99".into(),
            missing: Missing::Verse { chapter: 3, verse: 99 },
        };
        assert_eq!("verse 3:99 not found for `John 3:99`", err.to_string());
    }
}
