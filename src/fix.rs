//! GNSS fix record: validation and calendar-date derivation.

use chrono::NaiveDate;

use crate::error::Error;

/// One processed GNSS position fix.
///
/// Coordinates are WGS84 geodetic decimal degrees. The observation time is
/// carried as a (year, day-of-year) pair, matching the position files the
/// processing service emits. Fixes are expected in ascending time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub year: i32,
    pub day_of_year: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl Fix {
    pub fn new(year: i32, day_of_year: u32, latitude: f64, longitude: f64) -> Self {
        Fix {
            year,
            day_of_year,
            latitude,
            longitude,
        }
    }

    /// The calendar date named by this fix's (year, day-of-year) pair.
    ///
    /// Day 366 of a common year is an error, not a wrap into the next year.
    pub fn date(&self) -> Result<NaiveDate, Error> {
        NaiveDate::from_yo_opt(self.year, self.day_of_year).ok_or(Error::InvalidDate {
            year: self.year,
            day_of_year: self.day_of_year,
        })
    }

    /// Checks the coordinate ranges and the date.
    pub fn validate(&self) -> Result<(), Error> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(Error::InvalidCoordinate {
                year: self.year,
                day_of_year: self.day_of_year,
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        self.date().map(|_| ())
    }
}

/// Keeps the fixes whose date falls within the inclusive `[start, stop]` window.
pub fn filter_date_range(
    fixes: &[Fix],
    start: NaiveDate,
    stop: NaiveDate,
) -> Result<Vec<Fix>, Error> {
    let mut kept = Vec::new();
    for fix in fixes {
        let date = fix.date()?;
        if date >= start && date <= stop {
            kept.push(fix.clone());
        }
    }
    Ok(kept)
}

// -- Tests -------------------------------------------------------------------
