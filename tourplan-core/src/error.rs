use thiserror::Error;

/// Errors raised while validating input and building a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// A job's `job_type` is neither `delivery` nor `pickup`.
    #[error("job {job_id:?} has unsupported type {job_type:?} (expected delivery or pickup)")]
    UnsupportedJobType {
        /// Identifier of the offending job.
        job_id: String,
        /// Value found in the `job_type` column.
        job_type: String,
    },
    /// A job's time window bound is not an `HH:MM:SS` time of day.
    #[error("job {job_id:?} has invalid time of day {value:?} (expected HH:MM:SS)")]
    InvalidTimeOfDay {
        /// Identifier of the offending job.
        job_id: String,
        /// Value found in the `job_start` or `job_end` column.
        value: String,
    },
    /// Shift hours are outside `0..=23` or out of order.
    #[error("shift hours {start}..{end} must satisfy 0 <= start <= end <= 23")]
    InvalidShiftHours {
        /// Requested start hour.
        start: u8,
        /// Requested end hour.
        end: u8,
    },
    /// Capacity or vehicle count below one or above
    /// [`MAX_FLEET_PARAMETER`](crate::MAX_FLEET_PARAMETER).
    #[error("{name} must lie within 1..={max}, got {value}", max = crate::MAX_FLEET_PARAMETER)]
    InvalidFleetParameter {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// A cost input lies outside the range the planner form offers.
    #[error("{name} {value} is outside {min}..={max}")]
    ParameterOutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}

/// Errors raised while reading a routing response for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The plan holds no jobs, so no map centre exists.
    #[error("plan contains no jobs")]
    EmptyPlan,
    /// The response lacks a field or holds a non-numeric value.
    #[error("malformed routing response: {reason}")]
    MalformedResponse {
        /// What was wrong with the response.
        reason: String,
    },
}

impl RenderError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::MalformedResponse {
            reason: format!("missing field `{field}`"),
        }
    }
}
