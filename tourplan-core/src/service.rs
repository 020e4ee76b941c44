//! Seams to the external routing and directions services.
//!
//! Both traits are synchronous so the core stays embeddable in synchronous
//! callers; HTTP implementations live in `tourplan-data`.

use geo::Coord;
use thiserror::Error;

/// Errors from [`RoutingService`] and [`DirectionsProvider`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The call was made without any input.
    #[error("at least one waypoint is required")]
    EmptyInput,
    /// The service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL with credentials removed.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },
    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        /// Requested URL with credentials removed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Raw error payload from the provider.
        body: String,
    },
    /// The service could not be reached.
    #[error("failed to reach {url}: {message}")]
    Network {
        /// Requested URL with credentials removed.
        url: String,
        /// Underlying transport error.
        message: String,
    },
    /// The service answered with a payload that could not be read.
    #[error("failed to parse service response: {message}")]
    Parse {
        /// What went wrong.
        message: String,
    },
}

impl ServiceError {
    /// Whether retrying the same call may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network { .. })
    }
}

/// Submit a serialized tour-planning problem and return the raw solution.
///
/// # Examples
///
/// ```
/// use tourplan_core::{RoutingService, ServiceError};
///
/// struct Echo;
///
/// impl RoutingService for Echo {
///     fn submit(&self, body: &str) -> Result<String, ServiceError> {
///         Ok(body.to_owned())
///     }
/// }
///
/// assert_eq!(Echo.submit("{}")?, "{}");
/// # Ok::<(), ServiceError>(())
/// ```
pub trait RoutingService {
    /// Send `body` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the service cannot be reached or
    /// answers with a non-success status.
    fn submit(&self, body: &str) -> Result<String, ServiceError>;
}

/// Turn ordered waypoints into a road-following path.
///
/// Coordinates use `x` = longitude and `y` = latitude, the order directions
/// providers expect.
pub trait DirectionsProvider {
    /// Return the path through `waypoints`.
    ///
    /// # Errors
    ///
    /// Implementations must return [`ServiceError::EmptyInput`] when
    /// `waypoints` is empty.
    fn directions(&self, waypoints: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, ServiceError>;
}
