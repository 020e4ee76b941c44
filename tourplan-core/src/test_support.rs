//! Deterministic service doubles used by unit and behaviour tests.

use geo::Coord;

use crate::service::{DirectionsProvider, RoutingService, ServiceError};

/// `DirectionsProvider` whose path is the waypoint list itself.
#[derive(Default, Debug, Copy, Clone)]
pub struct StraightLineDirections;

impl DirectionsProvider for StraightLineDirections {
    fn directions(&self, waypoints: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, ServiceError> {
        if waypoints.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        Ok(waypoints.to_vec())
    }
}

/// `RoutingService` answering every submission with the same outcome.
#[derive(Debug, Clone)]
pub struct CannedRoutingService {
    outcome: Result<String, ServiceError>,
}

impl CannedRoutingService {
    /// Answer with `body`.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(body.into()),
        }
    }

    /// Fail with `error`.
    #[must_use]
    pub const fn failing(error: ServiceError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl RoutingService for CannedRoutingService {
    fn submit(&self, _body: &str) -> Result<String, ServiceError> {
        self.outcome.clone()
    }
}
