// File: ./src/error.rs
use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

/// Errors raised while turning a matched table row into a calendar entry.
///
/// None of these abort a page parse: the table parser logs them and keeps
/// the offending row as an invalid token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("invalid date entry: end {end} is not after start {start}")]
    InvalidRange {
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    },

    #[error("invalid calendar value in '{0}'")]
    InvalidCalendarValue(String),
}
