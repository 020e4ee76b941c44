//! Core domain for turning a planner's spreadsheet into a tour-planning
//! request and the routing service's answer into a map.
//!
//! The crate has no I/O of its own. It provides:
//! - **Request construction**: [`build_shift_window`], [`build_vehicle_type`],
//!   [`build_job`] and [`build_request`] map [`JobRow`]s, a [`FleetRow`] and
//!   [`PlanParameters`] into a [`RoutingRequest`] with the timestamp formats
//!   and cost units the routing service expects. [`serialize`] encodes it.
//! - **Solution rendering**: [`compute_centroid`], [`summarize`] and
//!   [`render_tours`] turn a [`RoutingResponse`] into [`SolutionStats`] and
//!   [`MapLayer`]s, calling a [`DirectionsProvider`] once per tour.
//! - **Pipeline**: [`prepare`], [`solve`] and [`plan`] chain the above around
//!   a [`RoutingService`].
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use tourplan_core::{FleetRow, JobRow, Location, PlanParameters, build_request, serialize};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
//! let depot = Location::new(52.1, 5.1);
//! let fleet = FleetRow { shift_start: depot, shift_end: depot };
//! let jobs = vec![
//!     JobRow::delivery("job_1", Location::new(52.0, 5.0), 3).with_window("08:00:00", "09:00:00"),
//! ];
//! let request = build_request(&jobs, &fleet, &PlanParameters::with_defaults(date))?;
//! let body = serialize(&request)?;
//! assert!(body.contains(r#""deliveries""#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod input;
mod params;
mod pipeline;
mod render;
pub mod request;
pub mod response;
mod service;
mod timestamp;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use builder::{build_job, build_request, build_shift_window, build_vehicle_type};
pub use error::{BuildError, RenderError};
pub use input::{FleetRow, JobKind, JobRow, Location, UnknownJobKind};
pub use params::{
    CapacityCoercion, CostInputs, DISTANCE_COST_RANGE, FIXED_COST_RANGE, MAX_FLEET_PARAMETER,
    MAX_SHIFT_HOUR, PlanParameters, Profile, ShiftHours, TIME_COST_RANGE, UnitPolicy, UnknownProfile,
};
pub use pipeline::{PlanError, PreparedPlan, RenderedSolution, plan, prepare, solve};
pub use render::{
    MapLayer, RenderedTours, SolutionStats, TourRenderFailure, compute_centroid, render_tours,
    summarize,
};
pub use request::{RoutingRequest, SerializationError, serialize, serialize_pretty};
pub use response::RoutingResponse;
pub use service::{DirectionsProvider, RoutingService, ServiceError};
