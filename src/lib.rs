//! Daily displacement and speed statistics for glacier-mounted GNSS stations.
//!
//! Consumes a time-ordered sequence of processed position fixes and produces
//! one statistics row per calendar day: the day's representative position,
//! forward azimuth and geodesic distance from the previous day's position on
//! the WGS84 ellipsoid, cumulative distance travelled, and a speed estimate.

pub mod error;
pub mod fix;
pub mod io;
pub mod stats;

pub use error::Error;
pub use fix::{filter_date_range, Fix};
pub use stats::{
    compute_daily_stats, compute_daily_stats_with, final_position_delta, max_displacement,
    min_displacement, missing_dates, DailyStat, RepresentativeSelection,
};
