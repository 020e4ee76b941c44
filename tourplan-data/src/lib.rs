//! Adapters around the tour-planning core.
//!
//! Responsibilities:
//! - Read planner workbooks into job and fleet rows ([`workbook`]).
//! - Talk to the tour-planning and directions services over HTTP
//!   ([`routing`]).
//! - Write rendered solutions as GeoJSON and HTML maps ([`map`]).
//!
//! Boundaries:
//! - Do not encode domain rules (live in `tourplan-core`).
//! - Keep blocking I/O off async executors; the HTTP clients own their
//!   runtime.
//!
//! Invariants:
//! - API keys never appear in error messages or logs.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod map;
pub mod routing;
pub mod workbook;

pub use map::{TileLayer, feature_collection, leaflet_page};
pub use routing::{
    HereTourPlanningClient, HttpClientConfig, OrsDirectionsClient, ProviderBuildError,
};
pub use workbook::{WorkbookData, WorkbookError, read_workbook};
