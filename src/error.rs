//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced while validating fixes or computing daily statistics.
#[derive(Debug, Error)]
pub enum Error {
    /// No fixes were supplied.
    #[error("no fixes supplied")]
    EmptyInput,

    /// A fix carries a coordinate outside the valid geodetic range.
    #[error(
        "invalid coordinate on {year} day {day_of_year}: \
         latitude {latitude} must be in [-90, 90], longitude {longitude} in [-180, 180]"
    )]
    InvalidCoordinate {
        year: i32,
        day_of_year: u32,
        latitude: f64,
        longitude: f64,
    },

    /// A (year, day-of-year) pair names no real calendar date.
    #[error("invalid date: year {year} has no day {day_of_year}")]
    InvalidDate { year: i32, day_of_year: u32 },

    /// Failed to read or write a fix or statistics file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV record could not be parsed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
