//! Date and time utilities.

use std::fmt;

use derive_more::{Display, Error};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};

/// Formats of naive date and time values produced by Django serializers.
const NAIVE: &[&[BorrowedFormatItem<'_>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

/// Format of date-only values.
const DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Display format of dates.
const DISPLAY_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[day]/[month]/[year]");

/// Display format of date and time values.
const DISPLAY_DATE_TIME: &[BorrowedFormatItem<'_>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// Date, optionally with time, as received from an API.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum DateTime {
    /// Calendar date without time.
    Date(Date),

    /// Date and time in UTC.
    DateTime(OffsetDateTime),
}

impl DateTime {
    /// Parses the provided `input` as an [RFC 3339] date and time, a naive
    /// ISO 8601 date and time (assumed to be UTC), or a plain date.
    ///
    /// # Errors
    ///
    /// Returns an error if the `input` matches none of the formats.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if let Ok(dt) = OffsetDateTime::parse(input, &Rfc3339) {
            return Ok(Self::DateTime(dt.to_offset(UtcOffset::UTC)));
        }
        if let Some(dt) = NAIVE
            .iter()
            .find_map(|f| PrimitiveDateTime::parse(input, *f).ok())
        {
            return Ok(Self::DateTime(dt.assume_utc()));
        }
        Date::parse(input, DATE)
            .map(Self::Date)
            .map_err(ParseError)
    }
}

impl fmt::Display for DateTime {
    /// Formats as `DD/MM/YYYY` or `DD/MM/YYYY HH:MM`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = match self {
            Self::Date(d) => d.format(DISPLAY_DATE),
            Self::DateTime(dt) => dt.format(DISPLAY_DATE_TIME),
        }
        .map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

/// Formats the provided `input` for display if it's a date, or returns
/// [`None`] otherwise.
#[must_use]
pub fn format(input: &str) -> Option<String> {
    DateTime::parse(input).ok().map(|dt| dt.to_string())
}

/// Error of parsing a [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid date: {_0}")]
pub struct ParseError(time::error::Parse);
