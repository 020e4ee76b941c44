//! Test utilities for the service clients.
//!
//! [`StubRoutingService`] and [`StubDirectionsProvider`] are deterministic
//! doubles that answer from scripted outcomes without any HTTP traffic and
//! record what they were asked.

use std::cell::RefCell;
use std::collections::VecDeque;

use geo::Coord;
use tourplan_core::{DirectionsProvider, RoutingService, ServiceError};

/// Stub `RoutingService` returning a fixed outcome and recording bodies.
///
/// # Example
///
/// ```
/// use tourplan_core::RoutingService;
/// use tourplan_data::routing::test_support::StubRoutingService;
///
/// let service = StubRoutingService::with_response(r#"{"tours":[]}"#);
/// assert_eq!(service.submit("{}").as_deref(), Ok(r#"{"tours":[]}"#));
/// assert_eq!(service.submitted(), vec!["{}".to_owned()]);
/// ```
#[derive(Debug, Clone)]
pub struct StubRoutingService {
    outcome: Result<String, ServiceError>,
    submitted: RefCell<Vec<String>>,
}

impl StubRoutingService {
    /// Create a service that answers every submission with `body`.
    #[must_use]
    pub fn with_response(body: impl Into<String>) -> Self {
        Self {
            outcome: Ok(body.into()),
            submitted: RefCell::new(Vec::new()),
        }
    }

    /// Create a service that fails every submission with `error`.
    #[must_use]
    pub const fn with_error(error: ServiceError) -> Self {
        Self {
            outcome: Err(error),
            submitted: RefCell::new(Vec::new()),
        }
    }

    /// Bodies received so far, in order.
    #[must_use]
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.borrow().clone()
    }
}

impl RoutingService for StubRoutingService {
    fn submit(&self, body: &str) -> Result<String, ServiceError> {
        self.submitted.borrow_mut().push(body.to_owned());
        self.outcome.clone()
    }
}

/// Stub `DirectionsProvider` answering from a per-call script.
///
/// Calls beyond the script echo the waypoints back as the path.
#[derive(Debug, Default, Clone)]
pub struct StubDirectionsProvider {
    script: RefCell<VecDeque<Result<Vec<Coord<f64>>, ServiceError>>>,
    calls: RefCell<Vec<Vec<Coord<f64>>>>,
}

impl StubDirectionsProvider {
    /// Create a provider that always echoes the waypoints.
    #[must_use]
    pub fn echo() -> Self {
        Self::default()
    }

    /// Create a provider that answers the first calls from `script`.
    #[must_use]
    pub fn scripted(script: impl IntoIterator<Item = Result<Vec<Coord<f64>>, ServiceError>>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Create a provider whose first call fails with `error`.
    #[must_use]
    pub fn failing_first(error: ServiceError) -> Self {
        Self::scripted([Err(error)])
    }

    /// Waypoint lists received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<Coord<f64>>> {
        self.calls.borrow().clone()
    }
}

impl DirectionsProvider for StubDirectionsProvider {
    fn directions(&self, waypoints: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, ServiceError> {
        if waypoints.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        self.calls.borrow_mut().push(waypoints.to_vec());
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(waypoints.to_vec()))
    }
}
