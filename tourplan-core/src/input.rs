//! Tabular input rows read from the plan and fleet sheets.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use serde::{Deserialize, Serialize};

/// A WGS84 position in the routing service's `{lat, lng}` order.
///
/// Directions providers expect `lon,lat` pairs instead; conversions to and
/// from [`geo::Coord`] (`x` = longitude, `y` = latitude) make the swap
/// explicit.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use tourplan_core::Location;
///
/// let location = Location::new(52.0, 5.0);
/// let coord = Coord::from(location);
/// assert_eq!(coord, Coord { x: 5.0, y: 52.0 });
/// assert_eq!(Location::from(coord), location);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Location {
    /// Construct a location from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Location> for Coord<f64> {
    fn from(location: Location) -> Self {
        Self {
            x: location.lng,
            y: location.lat,
        }
    }
}

impl From<Coord<f64>> for Location {
    fn from(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

/// The kind of stop a job represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Goods are dropped off at the stop.
    Delivery,
    /// Goods are collected at the stop.
    Pickup,
}

impl JobKind {
    /// Name used in the `job_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a `job_type` value names no known [`JobKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job type {0:?} (expected \"delivery\" or \"pickup\")")]
pub struct UnknownJobKind(pub String);

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            other => Err(UnknownJobKind(other.to_owned())),
        }
    }
}

/// One planned stop as read from the `plan` sheet.
///
/// `job_type` is kept verbatim; the request builder rejects values that do
/// not parse as a [`JobKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRow {
    /// Job identifier forwarded to the routing service.
    pub id: String,
    /// Raw `job_type` cell, `"delivery"` or `"pickup"`.
    pub job_type: String,
    /// Start of the time window as `HH:MM:SS`.
    pub start: String,
    /// End of the time window as `HH:MM:SS`.
    pub end: String,
    /// Service duration in seconds.
    pub duration: u64,
    /// Stop position.
    pub location: Location,
    /// Capacity units consumed by the job.
    pub demand: u32,
}

impl JobRow {
    /// Convenience constructor for a delivery stop.
    #[must_use]
    pub fn delivery(id: impl Into<String>, location: Location, demand: u32) -> Self {
        Self::with_kind(id, JobKind::Delivery, location, demand)
    }

    /// Convenience constructor for a pickup stop.
    #[must_use]
    pub fn pickup(id: impl Into<String>, location: Location, demand: u32) -> Self {
        Self::with_kind(id, JobKind::Pickup, location, demand)
    }

    fn with_kind(id: impl Into<String>, kind: JobKind, location: Location, demand: u32) -> Self {
        Self {
            id: id.into(),
            job_type: kind.as_str().to_owned(),
            start: "00:00:00".to_owned(),
            end: "23:59:59".to_owned(),
            duration: 0,
            location,
            demand,
        }
    }

    /// Replace the time window.
    #[must_use]
    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    /// Replace the service duration in seconds.
    #[must_use]
    pub const fn with_duration(mut self, seconds: u64) -> Self {
        self.duration = seconds;
        self
    }
}

/// The single fleet descriptor supplying shift start and end positions.
///
/// Only one fleet profile is supported per request, so callers pass exactly
/// one `FleetRow` rather than a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleetRow {
    /// Where every vehicle starts its shift.
    pub shift_start: Location,
    /// Where every vehicle ends its shift.
    pub shift_end: Location,
}
