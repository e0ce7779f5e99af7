//! CSV input and output for fix and statistics records.
//!
//! The positioning service emits one CSV per submitted receiver log with the
//! columns `year`, `day_of_year`, `latitude_decimal_degree` and
//! `longitude_decimal_degree` among others; only those four are consumed and
//! the rest are ignored. Statistics are written back out one row per day,
//! with empty fields where a value is undefined.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fix::Fix;
use crate::stats::DailyStat;

/// The subset of positioning-service output columns the engine consumes.
#[derive(Debug, Deserialize)]
struct FixRecord {
    year: i32,
    day_of_year: u32,
    latitude_decimal_degree: f64,
    longitude_decimal_degree: f64,
}

impl From<FixRecord> for Fix {
    fn from(record: FixRecord) -> Self {
        Fix::new(
            record.year,
            record.day_of_year,
            record.latitude_decimal_degree,
            record.longitude_decimal_degree,
        )
    }
}

/// One serialised statistics row.
#[derive(Debug, Serialize)]
struct StatRecord {
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    direction: Option<f64>,
    distance: Option<f64>,
    cumulative_distance: f64,
    speed: Option<f64>,
}

impl From<&DailyStat> for StatRecord {
    fn from(stat: &DailyStat) -> Self {
        StatRecord {
            date: stat.date,
            latitude: stat.latitude,
            longitude: stat.longitude,
            direction: stat.direction,
            distance: stat.distance,
            cumulative_distance: stat.cumulative_distance,
            speed: stat.speed,
        }
    }
}

/// Reads fixes from a positioning-service CSV, failing on the first record
/// that cannot be parsed or validated.
pub fn read_fixes<R: Read>(reader: R) -> Result<Vec<Fix>, Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut fixes = Vec::new();

    for result in csv_reader.deserialize() {
        let record: FixRecord = result?;
        let fix = Fix::from(record);
        fix.validate()?;
        fixes.push(fix);
    }

    log::debug!("read {} fixes", fixes.len());
    Ok(fixes)
}

/// Reads fixes, dropping records that cannot be parsed or validated instead
/// of aborting the batch.
pub fn read_fixes_lenient<R: Read>(reader: R) -> Result<Vec<Fix>, Error> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut fixes = Vec::new();
    let mut dropped = 0usize;

    for result in csv_reader.deserialize::<FixRecord>() {
        let fix = match result {
            Ok(record) => Fix::from(record),
            Err(e) => {
                log::warn!("dropping unparseable record: {e}");
                dropped += 1;
                continue;
            }
        };
        if let Err(e) = fix.validate() {
            log::warn!("dropping invalid fix: {e}");
            dropped += 1;
            continue;
        }
        fixes.push(fix);
    }

    log::debug!("read {} fixes, dropped {}", fixes.len(), dropped);
    Ok(fixes)
}

/// Reads fixes from a CSV file on disk.
pub fn read_fixes_path(path: &Path) -> Result<Vec<Fix>, Error> {
    read_fixes(File::open(path)?)
}

/// Writes one CSV row per day of statistics.
pub fn save_stats<W: Write>(stats: &[DailyStat], writer: W) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for stat in stats {
        csv_writer.serialize(StatRecord::from(stat))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the statistics to a CSV file on disk.
pub fn save_stats_path(stats: &[DailyStat], path: &Path) -> Result<(), Error> {
    save_stats(stats, File::create(path)?)
}

// -- Tests -------------------------------------------------------------------
