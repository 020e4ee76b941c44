//! Facade crate for the tour-planning toolkit.
//!
//! This crate re-exports the core request builder and solution renderer, and
//! exposes the spreadsheet reader, HTTP service clients and map output behind
//! the `http` feature.

#![forbid(unsafe_code)]

pub use tourplan_core::{
    BuildError, DirectionsProvider, FleetRow, JobKind, JobRow, Location, MapLayer, PlanError,
    PlanParameters, PreparedPlan, Profile, RenderError, RenderedSolution, RenderedTours,
    RoutingRequest, RoutingResponse, RoutingService, ServiceError, SolutionStats,
    TourRenderFailure, UnitPolicy, build_job, build_request, build_shift_window,
    build_vehicle_type, compute_centroid, plan, prepare, render_tours, serialize, solve,
    summarize,
};

#[cfg(feature = "http")]
pub use tourplan_data::{
    HereTourPlanningClient, HttpClientConfig, OrsDirectionsClient, ProviderBuildError, TileLayer,
    WorkbookData, WorkbookError, feature_collection, leaflet_page, read_workbook,
};
