//! Routing-service request document.
//!
//! Field names and nesting follow the tour-planning problem schema the
//! routing service validates: a fleet of vehicle types plus profile
//! descriptors, and a plan made of jobs. Numeric fields are always emitted as
//! JSON numbers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::Location;

/// Identifier given to every request unless the caller overrides it.
pub const DEFAULT_REQUEST_ID: &str = "request1";

/// Complete problem submitted to the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingRequest {
    /// Request identifier.
    pub id: String,
    /// Vehicles available to serve the plan.
    pub fleet: Fleet,
    /// Jobs to schedule.
    pub plan: Plan,
}

impl RoutingRequest {
    /// Replace the request identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Fleet section of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    /// Vehicle types; exactly one per request.
    pub types: Vec<VehicleType>,
    /// Routing profiles referenced by the vehicle types.
    pub profiles: Vec<ProfileDescriptor>,
}

/// A class of identical vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    /// Vehicle type identifier.
    pub id: String,
    /// Name of the routing profile the vehicles drive with.
    pub profile: String,
    /// Cost model.
    pub costs: Costs,
    /// Shifts the vehicles work.
    pub shifts: Vec<Shift>,
    /// Capacity per vehicle, single dimension.
    pub capacity: Vec<Quantity>,
    /// Number of vehicles of this type.
    pub amount: Quantity,
}

/// Cost model of a vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Costs {
    /// Fixed cost per used vehicle.
    pub fixed: f64,
    /// Cost per distance unit.
    pub distance: f64,
    /// Cost per time unit.
    pub time: f64,
}

/// Start and end of a vehicle shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Where and when the shift starts.
    pub start: ShiftPoint,
    /// Where and when the shift ends.
    pub end: ShiftPoint,
}

/// A timestamped shift boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftPoint {
    /// `YYYY-MM-DDTHH:MM:SSZ` timestamp.
    pub time: String,
    /// Shift boundary position.
    pub location: Location,
}

/// Routing profile descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDescriptor {
    /// Profile type, `car` or `truck`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Profile name referenced from [`VehicleType::profile`].
    pub name: String,
}

/// Plan section of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Jobs to assign to tours.
    pub jobs: Vec<Job>,
}

/// A single job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier.
    pub id: String,
    /// The job's place list.
    pub places: Places,
}

/// A job's places: either deliveries or pickups, never both.
///
/// Serialises as `{"deliveries": [...]}` or `{"pickups": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Places {
    /// Drop-off places.
    Deliveries(Vec<JobPlace>),
    /// Collection places.
    Pickups(Vec<JobPlace>),
}

impl Places {
    /// Delivery places, if this is a delivery job.
    #[must_use]
    pub fn deliveries(&self) -> Option<&[JobPlace]> {
        match self {
            Self::Deliveries(places) => Some(places),
            Self::Pickups(_) => None,
        }
    }

    /// Pickup places, if this is a pickup job.
    #[must_use]
    pub fn pickups(&self) -> Option<&[JobPlace]> {
        match self {
            Self::Pickups(places) => Some(places),
            Self::Deliveries(_) => None,
        }
    }
}

/// Where, when and how long a job is served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPlace {
    /// Time windows as `[start, end]` timestamp pairs.
    pub times: Vec<[String; 2]>,
    /// Job position.
    pub location: Location,
    /// Service duration in seconds.
    pub duration: u64,
    /// Demand, single dimension.
    pub demand: Vec<u32>,
}

/// A capacity or vehicle count.
///
/// Whole values serialise as JSON integers. Fractional values can only arise
/// from a profile that forwards inputs verbatim and serialise as decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    /// Non-negative integral value.
    Whole(u64),
    /// Any other value.
    Fractional(f64),
}

impl Quantity {
    /// Classify a raw number.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "integral, non-negative values within u64 range are converted exactly"
    )]
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
            Self::Whole(value as u64)
        } else {
            Self::Fractional(value)
        }
    }
}

/// Encoding a request as JSON failed.
#[derive(Debug, Error)]
#[error("failed to encode routing request: {0}")]
pub struct SerializationError(#[from] serde_json::Error);

/// Encode a request as compact JSON.
///
/// # Errors
///
/// Returns [`SerializationError`] if the encoder rejects the document.
pub fn serialize(request: &RoutingRequest) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(request)?)
}

/// Encode a request as indented JSON for display.
///
/// # Errors
///
/// Returns [`SerializationError`] if encoding fails.
pub fn serialize_pretty(request: &RoutingRequest) -> Result<String, SerializationError> {
    Ok(serde_json::to_string_pretty(request)?)
}
