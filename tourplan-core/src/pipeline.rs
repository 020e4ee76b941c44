//! End-to-end planning pipeline usable from any front end.
//!
//! [`prepare`] does everything that needs no network: validation, request
//! construction and encoding. [`solve`] submits the prepared request and
//! renders the answer. [`plan`] runs both.

use thiserror::Error;

use crate::builder::build_request;
use crate::error::{BuildError, RenderError};
use crate::input::{FleetRow, JobRow, Location};
use crate::params::PlanParameters;
use crate::render::{RenderedTours, SolutionStats, compute_centroid, render_tours, summarize};
use crate::request::{RoutingRequest, SerializationError, serialize};
use crate::response::RoutingResponse;
use crate::service::{DirectionsProvider, RoutingService, ServiceError};

/// Errors that abort the pipeline.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Input rows or parameters were rejected before any network call.
    #[error("invalid input: {0}")]
    Input(#[from] BuildError),
    /// The request could not be encoded.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    /// The routing service failed.
    #[error("routing service failed: {0}")]
    Service(#[from] ServiceError),
    /// The plan or the routing response could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A validated, encoded request ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPlan {
    /// The request document.
    pub request: RoutingRequest,
    /// Its JSON encoding, exactly as submitted.
    pub request_json: String,
    /// Map centre derived from the jobs.
    pub centroid: Location,
}

impl PreparedPlan {
    /// Replace the request id and re-encode.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Serialization`] if re-encoding fails.
    pub fn with_request_id(self, id: impl Into<String>) -> Result<Self, PlanError> {
        let request = self.request.with_id(id);
        let request_json = serialize(&request)?;
        Ok(Self {
            request,
            request_json,
            centroid: self.centroid,
        })
    }
}

/// Everything produced by a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSolution {
    /// The submitted request.
    pub request: RoutingRequest,
    /// The submitted request body.
    pub request_json: String,
    /// The raw response body.
    pub response_json: String,
    /// The parsed response.
    pub response: RoutingResponse,
    /// Headline statistics.
    pub stats: SolutionStats,
    /// Map centre.
    pub centroid: Location,
    /// Map layers and per-tour failures.
    pub tours: RenderedTours,
}

/// Validate inputs, build the request and encode it.
///
/// # Errors
///
/// Returns [`PlanError::Render`] for an empty job list,
/// [`PlanError::Input`] for rejected rows or parameters and
/// [`PlanError::Serialization`] if encoding fails.
pub fn prepare(
    jobs: &[JobRow],
    fleet: &FleetRow,
    params: &PlanParameters,
) -> Result<PreparedPlan, PlanError> {
    let centroid = compute_centroid(jobs)?;
    let request = build_request(jobs, fleet, params)?;
    let request_json = serialize(&request)?;
    Ok(PreparedPlan {
        request,
        request_json,
        centroid,
    })
}

/// Submit a prepared request and render the solution.
///
/// Directions failures for individual tours do not abort; they are listed in
/// [`RenderedTours::failures`].
///
/// # Errors
///
/// Returns [`PlanError::Service`] when submission fails and
/// [`PlanError::Render`] when the response cannot be read.
pub fn solve(
    prepared: PreparedPlan,
    service: &dyn RoutingService,
    directions: &dyn DirectionsProvider,
) -> Result<RenderedSolution, PlanError> {
    let PreparedPlan {
        request,
        request_json,
        centroid,
    } = prepared;
    log::info!(
        "submitting routing request {} with {} jobs",
        request.id,
        request.plan.jobs.len()
    );
    let response_json = service.submit(&request_json)?;
    let response = RoutingResponse::from_json(&response_json)?;
    let stats = summarize(&response)?;
    let tours = render_tours(&response, directions);
    log::info!(
        "rendered {} tours ({} without a path)",
        response.tours.len(),
        tours.failures.len()
    );
    Ok(RenderedSolution {
        request,
        request_json,
        response_json,
        response,
        stats,
        centroid,
        tours,
    })
}

/// Run the whole pipeline: prepare, submit, render.
///
/// # Errors
///
/// See [`prepare`] and [`solve`].
pub fn plan(
    jobs: &[JobRow],
    fleet: &FleetRow,
    params: &PlanParameters,
    service: &dyn RoutingService,
    directions: &dyn DirectionsProvider,
) -> Result<RenderedSolution, PlanError> {
    let prepared = prepare(jobs, fleet, params)?;
    solve(prepared, service, directions)
}
