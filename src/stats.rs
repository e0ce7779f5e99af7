//! Daily displacement and speed statistics.
//!
//! Buckets a time-ordered fix sequence into calendar days, selects one
//! representative position per day, and solves the inverse geodesic problem
//! on the WGS84 ellipsoid between consecutive representatives.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use geo::{GeodesicBearing, GeodesicDistance, Point};

use crate::error::Error;
use crate::fix::Fix;

/// How the representative position for a calendar day is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepresentativeSelection {
    /// The last fix of the day in input order. Matches end-of-day logging,
    /// where the final fix of a session stands for the day's position.
    #[default]
    Last,
    /// Arithmetic mean of the day's latitudes and longitudes.
    Mean,
}

/// One output row per calendar day with at least one fix.
///
/// Angles are decimal degrees, distances meters, speed meters per hour.
/// `direction`, `distance` and `speed` are `None` on the first row, which has
/// no prior reference point. `direction` is also `None` on a day the position
/// did not move, since a zero-length path has no bearing.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    /// Forward azimuth from the previous day's position, in [0°, 360°).
    pub direction: Option<f64>,
    /// Geodesic distance from the previous day's position, in meters.
    pub distance: Option<f64>,
    /// Running sum of `distance` up to and including this row.
    pub cumulative_distance: f64,
    /// `distance` divided by the hours elapsed since the previous row.
    pub speed: Option<f64>,
}

/// Computes one [`DailyStat`] per distinct calendar day in `fixes`, using the
/// default `Last` representative selection.
pub fn compute_daily_stats(fixes: &[Fix]) -> Result<Vec<DailyStat>, Error> {
    compute_daily_stats_with(fixes, RepresentativeSelection::Last)
}

/// Computes daily statistics with an explicit representative selection.
///
/// Fails on the first fix with an out-of-range coordinate or an impossible
/// (year, day-of-year) pair; no partial result is returned. Days with no fix
/// produce no row, and the elapsed time used for the speed of the next row
/// grows accordingly.
pub fn compute_daily_stats_with(
    fixes: &[Fix],
    selection: RepresentativeSelection,
) -> Result<Vec<DailyStat>, Error> {
    if fixes.is_empty() {
        return Err(Error::EmptyInput);
    }

    // Group by calendar date, preserving input order within each day.
    let mut days: BTreeMap<NaiveDate, Vec<&Fix>> = BTreeMap::new();
    for fix in fixes {
        fix.validate()?;
        days.entry(fix.date()?).or_default().push(fix);
    }

    let mut stats = Vec::with_capacity(days.len());
    let mut cumulative = 0.0;
    let mut previous: Option<(NaiveDate, Point<f64>)> = None;

    for (date, group) in days {
        let (latitude, longitude) = representative(&group, selection);
        let position = Point::new(longitude, latitude);

        let (direction, distance, speed) = match previous {
            None => (None, None, None),
            Some((prev_date, prev_position)) => {
                let (azimuth, meters) = prev_position.geodesic_bearing_distance(position);
                if meters == 0.0 {
                    (None, Some(0.0), Some(0.0))
                } else {
                    let hours = (date - prev_date).num_days() as f64 * 24.0;
                    // Raw azimuth is in (-180°, 180°]; fold into [0°, 360°).
                    let bearing = (azimuth + 360.0) % 360.0;
                    (Some(bearing), Some(meters), Some(meters / hours))
                }
            }
        };

        cumulative += distance.unwrap_or(0.0);
        stats.push(DailyStat {
            date,
            latitude,
            longitude,
            direction,
            distance,
            cumulative_distance: cumulative,
            speed,
        });
        previous = Some((date, position));
    }

    Ok(stats)
}

// Groups are only built with at least one member.
fn representative(group: &[&Fix], selection: RepresentativeSelection) -> (f64, f64) {
    match selection {
        RepresentativeSelection::Last => {
            let fix = group[group.len() - 1];
            (fix.latitude, fix.longitude)
        }
        RepresentativeSelection::Mean => {
            let count = group.len() as f64;
            let latitude = group.iter().map(|f| f.latitude).sum::<f64>() / count;
            let longitude = group.iter().map(|f| f.longitude).sum::<f64>() / count;
            (latitude, longitude)
        }
    }
}

/// Geodesic distance in meters between the final positions of two fix
/// sequences, e.g. static vs. kinematic processing of the same receiver.
pub fn final_position_delta(a: &[Fix], b: &[Fix]) -> Result<f64, Error> {
    let last_a = a.last().ok_or(Error::EmptyInput)?;
    let last_b = b.last().ok_or(Error::EmptyInput)?;
    last_a.validate()?;
    last_b.validate()?;

    let point_a = Point::new(last_a.longitude, last_a.latitude);
    let point_b = Point::new(last_b.longitude, last_b.latitude);
    Ok(point_a.geodesic_distance(&point_b))
}

/// The row with the largest daily displacement, if any row has one.
pub fn max_displacement(stats: &[DailyStat]) -> Option<&DailyStat> {
    stats
        .iter()
        .filter(|stat| stat.distance.is_some())
        .max_by(|a, b| compare_distance(a, b))
}

/// The row with the smallest daily displacement, if any row has one.
pub fn min_displacement(stats: &[DailyStat]) -> Option<&DailyStat> {
    stats
        .iter()
        .filter(|stat| stat.distance.is_some())
        .min_by(|a, b| compare_distance(a, b))
}

fn compare_distance(a: &DailyStat, b: &DailyStat) -> Ordering {
    let da = a.distance.unwrap_or(0.0);
    let db = b.distance.unwrap_or(0.0);
    da.partial_cmp(&db).unwrap_or(Ordering::Equal)
}

/// Calendar days between the first and last row that have no row, i.e. days
/// on which the receiver reported nothing.
pub fn missing_dates(stats: &[DailyStat]) -> Vec<NaiveDate> {
    let (first, last) = match (stats.first(), stats.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Vec::new(),
    };

    let present: BTreeSet<NaiveDate> = stats.iter().map(|stat| stat.date).collect();
    first
        .date
        .iter_days()
        .take_while(|date| *date < last.date)
        .filter(|date| !present.contains(date))
        .collect()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn fix(year: i32, day_of_year: u32, latitude: f64, longitude: f64) -> Fix {
        Fix::new(year, day_of_year, latitude, longitude)
    }

    #[test]
    fn should_reject_empty_input() {
        assert!(matches!(compute_daily_stats(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn should_reject_invalid_fix() {
        let fixes = vec![fix(2022, 1, 70.0, -80.0), fix(2022, 2, 91.0, -80.0)];
        assert!(matches!(
            compute_daily_stats(&fixes),
            Err(Error::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn should_compute_northward_displacement() {
        let fixes = vec![fix(2022, 1, 70.0, -80.0), fix(2022, 2, 70.01, -80.0)];
        let stats = compute_daily_stats(&fixes).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].direction, None);
        assert_eq!(stats[0].distance, None);
        assert_eq!(stats[0].speed, None);
        assert_eq!(stats[0].cumulative_distance, 0.0);

        // 0.01° of latitude at 70°N is roughly 1.1 km due north.
        let distance = stats[1].distance.unwrap();
        assert_abs_diff_eq!(stats[1].direction.unwrap(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(distance, 1115.6, max_relative = 0.01);
        assert_relative_eq!(stats[1].speed.unwrap(), distance / 24.0);
        assert_relative_eq!(stats[1].cumulative_distance, distance);
    }

    #[test]
    fn should_leave_direction_undefined_when_stationary() {
        let fixes = vec![fix(2022, 1, 70.0, -80.0), fix(2022, 2, 70.0, -80.0)];
        let stats = compute_daily_stats(&fixes).unwrap();

        assert_eq!(stats[1].direction, None);
        assert_eq!(stats[1].distance, Some(0.0));
        assert_eq!(stats[1].speed, Some(0.0));
        assert_eq!(stats[1].cumulative_distance, 0.0);
    }

    #[test]
    fn should_average_speed_across_gaps() {
        // Days 150 and 153: no fixes in between, so 72 elapsed hours.
        let fixes = vec![fix(2022, 150, 70.0, -80.0), fix(2022, 153, 70.01, -80.0)];
        let stats = compute_daily_stats(&fixes).unwrap();

        assert_eq!(stats.len(), 2);
        let distance = stats[1].distance.unwrap();
        assert_relative_eq!(stats[1].speed.unwrap(), distance / 72.0);
    }

    #[test]
    fn should_use_last_fix_of_day() {
        let fixes = vec![
            fix(2022, 1, 70.0, -80.0),
            fix(2022, 1, 70.005, -80.0),
            fix(2022, 2, 70.01, -80.0),
        ];
        let stats = compute_daily_stats(&fixes).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].latitude, 70.005);
    }

    #[test]
    fn should_average_positions_with_mean_policy() {
        let fixes = vec![fix(2022, 1, 70.0, -80.0), fix(2022, 1, 70.02, -80.02)];
        let stats =
            compute_daily_stats_with(&fixes, RepresentativeSelection::Mean).unwrap();

        assert_eq!(stats.len(), 1);
        assert_relative_eq!(stats[0].latitude, 70.01, epsilon = 1e-9);
        assert_relative_eq!(stats[0].longitude, -80.01, epsilon = 1e-9);
    }

    #[test]
    fn should_normalise_westward_azimuth() {
        let fixes = vec![fix(2022, 1, 70.0, -80.0), fix(2022, 2, 70.0, -80.01)];
        let stats = compute_daily_stats(&fixes).unwrap();

        let direction = stats[1].direction.unwrap();
        assert!((0.0..360.0).contains(&direction));
        assert_relative_eq!(direction, 270.0, max_relative = 0.01);
    }

    #[test]
    fn should_keep_dates_ordered_and_distances_accumulated() {
        let fixes = vec![
            fix(2022, 11, 70.001, -80.0),
            fix(2022, 10, 70.0, -80.0),
            fix(2022, 13, 70.002, -80.0),
            fix(2022, 14, 70.003, -80.0),
        ];
        let stats = compute_daily_stats(&fixes).unwrap();

        assert_eq!(stats.len(), 4);
        for pair in stats.windows(2) {
            assert!(pair[1].date > pair[0].date);
            let distance = pair[1].distance.unwrap();
            assert!(distance >= 0.0);
            let direction = pair[1].direction.unwrap();
            assert!((0.0..360.0).contains(&direction));
            assert_relative_eq!(
                pair[1].cumulative_distance,
                pair[0].cumulative_distance + distance
            );
        }
        assert_eq!(stats[0].cumulative_distance, 0.0);
    }

    #[test]
    fn should_measure_final_position_delta() {
        let static_run = vec![fix(2022, 1, 70.0, -80.0), fix(2022, 2, 70.0, -80.0)];
        let kinematic_run = vec![fix(2022, 1, 70.0, -80.0), fix(2022, 2, 70.01, -80.0)];

        let delta = final_position_delta(&static_run, &kinematic_run).unwrap();
        assert_relative_eq!(delta, 1115.6, max_relative = 0.01);

        let zero = final_position_delta(&static_run, &static_run).unwrap();
        assert_eq!(zero, 0.0);
    }

    #[test]
    fn should_find_displacement_extremes() {
        let fixes = vec![
            fix(2022, 1, 70.0, -80.0),
            fix(2022, 2, 70.01, -80.0),
            fix(2022, 3, 70.011, -80.0),
        ];
        let stats = compute_daily_stats(&fixes).unwrap();

        let max = max_displacement(&stats).unwrap();
        let min = min_displacement(&stats).unwrap();
        assert_eq!(max.date, NaiveDate::from_yo_opt(2022, 2).unwrap());
        assert_eq!(min.date, NaiveDate::from_yo_opt(2022, 3).unwrap());
    }

    #[test]
    fn should_list_missing_dates() {
        let fixes = vec![
            fix(2022, 10, 70.0, -80.0),
            fix(2022, 11, 70.001, -80.0),
            fix(2022, 14, 70.002, -80.0),
        ];
        let stats = compute_daily_stats(&fixes).unwrap();

        let missing = missing_dates(&stats);
        assert_eq!(
            missing,
            vec![
                NaiveDate::from_yo_opt(2022, 12).unwrap(),
                NaiveDate::from_yo_opt(2022, 13).unwrap(),
            ]
        );

        assert!(missing_dates(&[]).is_empty());
    }
}
