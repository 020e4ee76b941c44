//! HTTP clients for the tour-planning service and the directions provider.
//!
//! [`HereTourPlanningClient`] implements [`tourplan_core::RoutingService`]
//! and [`OrsDirectionsClient`] implements
//! [`tourplan_core::DirectionsProvider`]. Both block on async `reqwest`
//! calls internally and retry timeouts and network failures with a doubling
//! backoff; HTTP status errors are returned at once with the provider's raw
//! payload.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tourplan_data::routing::{HereTourPlanningClient, HttpClientConfig, OrsDirectionsClient};
//!
//! let config = HttpClientConfig::new("https://tourplanning.hereapi.com")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_retries(3);
//! let routing = HereTourPlanningClient::with_config(config, "here-key")?;
//! let directions = OrsDirectionsClient::new("ors-key")?;
//! # let _ = (routing, directions);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod here;
mod http;
mod ors;

#[doc(hidden)]
pub mod test_support;

pub use here::{DEFAULT_ROUTING_BASE_URL, HereTourPlanningClient};
pub use http::{
    DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpClientConfig,
    ProviderBuildError,
};
pub use ors::{DEFAULT_DIRECTIONS_BASE_URL, DEFAULT_DIRECTIONS_PROFILE, OrsDirectionsClient};
