//! Routing-service response document.
//!
//! Only the fields the renderer reads are modelled. Statistic fields are
//! optional so [`summarize`](crate::summarize) can name whichever one is
//! missing; a field holding a non-numeric value fails parsing outright.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::input::Location;

/// Solution returned by the routing service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutingResponse {
    /// Aggregate solution statistics.
    #[serde(default)]
    pub statistic: Option<Statistic>,
    /// One tour per used vehicle, in service order.
    #[serde(default)]
    pub tours: Vec<Tour>,
    /// Jobs the service could not assign.
    #[serde(default)]
    pub unassigned: Vec<UnassignedJob>,
}

impl RoutingResponse {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MalformedResponse`] when the body is not JSON
    /// or a modelled field has the wrong type.
    pub fn from_json(body: &str) -> Result<Self, RenderError> {
        serde_json::from_str(body).map_err(|err| RenderError::MalformedResponse {
            reason: err.to_string(),
        })
    }
}

/// Aggregate cost, distance and time statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistic {
    /// Total cost.
    #[serde(default)]
    pub cost: Option<f64>,
    /// Total distance in metres.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Time breakdown in seconds.
    #[serde(default)]
    pub times: Option<Times>,
}

/// Time breakdown in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Times {
    /// Time spent driving.
    #[serde(default)]
    pub driving: Option<f64>,
    /// Time spent serving jobs.
    #[serde(default)]
    pub serving: Option<f64>,
    /// Time spent waiting for windows to open.
    #[serde(default)]
    pub waiting: Option<f64>,
    /// Time spent on breaks.
    #[serde(default, rename = "break")]
    pub break_time: Option<f64>,
}

/// One vehicle's ordered stops.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tour {
    /// Vehicle the tour is assigned to.
    #[serde(default, rename = "vehicleId")]
    pub vehicle_id: Option<String>,
    /// Stops in visiting order.
    #[serde(default)]
    pub stops: Vec<Stop>,
}

/// A stop along a tour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Stop position.
    pub location: Location,
}

/// A job left out of every tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedJob {
    /// Identifier of the job.
    #[serde(rename = "jobId")]
    pub job_id: String,
    /// Why the job could not be assigned.
    #[serde(default)]
    pub reasons: Vec<UnassignedReason>,
}

/// A reason code explaining an unassigned job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedReason {
    /// Machine-readable reason code.
    #[serde(default)]
    pub code: String,
    /// Human-readable explanation.
    #[serde(default)]
    pub description: String,
}
