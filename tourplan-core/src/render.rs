//! Turn a routing response into map layers and summary statistics.

use std::fmt;

use geo::Coord;

use crate::error::RenderError;
use crate::input::{JobRow, Location};
use crate::response::{RoutingResponse, Tour};
use crate::service::{DirectionsProvider, ServiceError};

const METRES_PER_KILOMETRE: f64 = 1000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Mean position of all jobs, used to centre the map.
///
/// # Errors
///
/// Returns [`RenderError::EmptyPlan`] when `jobs` is empty.
///
/// # Examples
///
/// ```
/// use tourplan_core::{JobRow, Location, compute_centroid};
///
/// let jobs = vec![
///     JobRow::delivery("a", Location::new(10.0, 0.0), 1),
///     JobRow::delivery("b", Location::new(20.0, 10.0), 1),
///     JobRow::delivery("c", Location::new(30.0, 20.0), 1),
/// ];
/// assert_eq!(compute_centroid(&jobs)?, Location::new(20.0, 10.0));
/// # Ok::<(), tourplan_core::RenderError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the centroid is the arithmetic mean of job coordinates"
)]
pub fn compute_centroid(jobs: &[JobRow]) -> Result<Location, RenderError> {
    if jobs.is_empty() {
        return Err(RenderError::EmptyPlan);
    }
    let (lat_sum, lng_sum) = jobs.iter().fold((0.0, 0.0), |(lat, lng), job| {
        (lat + job.location.lat, lng + job.location.lng)
    });
    let count = jobs.len() as f64;
    Ok(Location::new(lat_sum / count, lng_sum / count))
}

/// Headline figures of a solution in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionStats {
    /// Total cost in the service's cost units.
    pub total_cost: f64,
    /// Total distance in kilometres.
    pub total_distance_km: f64,
    /// Driving time in hours.
    pub driving_hours: f64,
    /// Serving time in hours.
    pub serving_hours: f64,
    /// Waiting time in hours.
    pub waiting_hours: f64,
    /// Break time in hours.
    pub break_hours: f64,
}

impl SolutionStats {
    /// Labelled values in table order.
    #[must_use]
    pub const fn rows(&self) -> [(&'static str, f64); 6] {
        [
            ("Total Cost", self.total_cost),
            ("Total Distance", self.total_distance_km),
            ("Total Driving Time", self.driving_hours),
            ("Total Serving Time", self.serving_hours),
            ("Total Waiting Time", self.waiting_hours),
            ("Total Break Time", self.break_hours),
        ]
    }
}

impl fmt::Display for SolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{label:<20} {value:>12.3}")?;
        }
        Ok(())
    }
}

/// Extract headline statistics, converting metres to kilometres and seconds
/// to hours.
///
/// # Errors
///
/// Returns [`RenderError::MalformedResponse`] naming the first missing
/// statistic field.
#[expect(
    clippy::float_arithmetic,
    reason = "unit conversion divides by metres per km and seconds per hour"
)]
pub fn summarize(response: &RoutingResponse) -> Result<SolutionStats, RenderError> {
    let statistic = response
        .statistic
        .as_ref()
        .ok_or_else(|| RenderError::missing("statistic"))?;
    let times = statistic
        .times
        .as_ref()
        .ok_or_else(|| RenderError::missing("statistic.times"))?;
    let hours = |value: Option<f64>, field: &str| {
        value
            .map(|seconds| seconds / SECONDS_PER_HOUR)
            .ok_or_else(|| RenderError::missing(field))
    };
    Ok(SolutionStats {
        total_cost: statistic
            .cost
            .ok_or_else(|| RenderError::missing("statistic.cost"))?,
        total_distance_km: statistic
            .distance
            .map(|metres| metres / METRES_PER_KILOMETRE)
            .ok_or_else(|| RenderError::missing("statistic.distance"))?,
        driving_hours: hours(times.driving, "statistic.times.driving")?,
        serving_hours: hours(times.serving, "statistic.times.serving")?,
        waiting_hours: hours(times.waiting, "statistic.times.waiting")?,
        break_hours: hours(times.break_time, "statistic.times.break")?,
    })
}

/// A drawable element of the solution map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapLayer {
    /// A stop marker.
    Marker {
        /// Index of the tour the stop belongs to.
        tour: usize,
        /// Stop position.
        location: Location,
    },
    /// A road-following path for one tour.
    Polyline {
        /// Index of the tour.
        tour: usize,
        /// Path positions in drawing order.
        path: Vec<Location>,
    },
}

/// A tour whose directions lookup failed; its markers are still drawn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tour {tour}: directions lookup failed: {error}")]
pub struct TourRenderFailure {
    /// Index of the tour.
    pub tour: usize,
    /// Error reported by the directions provider.
    pub error: ServiceError,
}

/// Layers for every tour plus any per-tour lookup failures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedTours {
    /// Markers and polylines in tour order.
    pub layers: Vec<MapLayer>,
    /// Tours drawn without a polyline.
    pub failures: Vec<TourRenderFailure>,
}

impl RenderedTours {
    /// Number of polylines drawn.
    #[must_use]
    pub fn polyline_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|layer| matches!(layer, MapLayer::Polyline { .. }))
            .count()
    }
}

/// Draw every tour: one marker per stop and one polyline per tour.
///
/// Each tour triggers one directions lookup. A failed lookup is recorded in
/// [`RenderedTours::failures`] and the remaining tours are still drawn. Tours
/// with fewer than two stops get markers only.
pub fn render_tours(
    response: &RoutingResponse,
    directions: &dyn DirectionsProvider,
) -> RenderedTours {
    let mut rendered = RenderedTours::default();
    for (index, tour) in response.tours.iter().enumerate() {
        rendered
            .layers
            .extend(tour.stops.iter().map(|stop| MapLayer::Marker {
                tour: index,
                location: stop.location,
            }));
        match route_tour(tour, directions) {
            Ok(Some(path)) => rendered.layers.push(MapLayer::Polyline { tour: index, path }),
            Ok(None) => log::debug!("tour {index} has fewer than two stops; skipping polyline"),
            Err(error) => {
                log::warn!("directions lookup for tour {index} failed: {error}");
                rendered.failures.push(TourRenderFailure { tour: index, error });
            }
        }
    }
    rendered
}

fn route_tour(
    tour: &Tour,
    directions: &dyn DirectionsProvider,
) -> Result<Option<Vec<Location>>, ServiceError> {
    if tour.stops.len() < 2 {
        return Ok(None);
    }
    let waypoints: Vec<Coord<f64>> = tour
        .stops
        .iter()
        .map(|stop| Coord::from(stop.location))
        .collect();
    let path = directions.directions(&waypoints)?;
    Ok(Some(path.into_iter().map(Location::from).collect()))
}
