//! Directions client for the openrouteservice GeoJSON directions endpoint.
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/v2/directions>

use geo::Coord;
use serde::{Deserialize, Serialize};
use tourplan_core::{DirectionsProvider, ServiceError};
use url::Url;

use super::http::{HttpClientConfig, HttpTransport, JsonPost, ProviderBuildError};

/// Default base URL of the directions service.
pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://api.openrouteservice.org";

/// Default directions profile.
pub const DEFAULT_DIRECTIONS_PROFILE: &str = "driving-car";

/// Request body: waypoints as `[lon, lat]` pairs.
#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
}

/// The parts of the GeoJSON answer the client reads.
#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// Positions as `[lon, lat]` or `[lon, lat, elevation]`.
    coordinates: Vec<Vec<f64>>,
}

impl DirectionsResponse {
    /// Path of the first route, in `x` = longitude order.
    pub(crate) fn into_path(self) -> Result<Vec<Coord<f64>>, ServiceError> {
        let feature = self
            .features
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Parse {
                message: "directions response contains no features".to_owned(),
            })?;
        feature
            .geometry
            .coordinates
            .into_iter()
            .map(|position| match position.as_slice() {
                [lon, lat, ..] => Ok(Coord { x: *lon, y: *lat }),
                _ => Err(ServiceError::Parse {
                    message: format!("position {position:?} has fewer than two values"),
                }),
            })
            .collect()
    }
}

/// [`DirectionsProvider`] backed by openrouteservice.
///
/// The API key is sent in the `Authorization` header.
#[derive(Debug)]
pub struct OrsDirectionsClient {
    transport: HttpTransport,
    endpoint: Url,
    api_key: String,
}

impl OrsDirectionsClient {
    /// Client for the public service and the `driving-car` profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(
            HttpClientConfig::new(DEFAULT_DIRECTIONS_BASE_URL),
            DEFAULT_DIRECTIONS_PROFILE,
            api_key,
        )
    }

    /// Client with explicit connection settings and profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(
        config: HttpClientConfig,
        profile: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderBuildError> {
        let endpoint = config.endpoint(&format!("v2/directions/{profile}/geojson"))?;
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            transport,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Connection settings in use.
    #[must_use]
    pub const fn config(&self) -> &HttpClientConfig {
        self.transport.config()
    }
}

fn request_body(waypoints: &[Coord<f64>]) -> Result<String, ServiceError> {
    let request = DirectionsRequest {
        coordinates: waypoints.iter().map(|coord| [coord.x, coord.y]).collect(),
    };
    serde_json::to_string(&request).map_err(|err| ServiceError::Parse {
        message: err.to_string(),
    })
}

impl DirectionsProvider for OrsDirectionsClient {
    fn directions(&self, waypoints: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, ServiceError> {
        if waypoints.is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        let body = request_body(waypoints)?;
        let answer = self.transport.post_json(&JsonPost {
            url: &self.endpoint,
            body: &body,
            authorization: Some(&self.api_key),
        })?;
        let response: DirectionsResponse =
            serde_json::from_str(&answer).map_err(|err| ServiceError::Parse {
                message: err.to_string(),
            })?;
        response.into_path()
    }
}
