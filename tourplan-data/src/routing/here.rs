//! Tour-planning client for the HERE Tour Planning API.

use tourplan_core::{RoutingService, ServiceError};
use url::Url;

use super::http::{HttpClientConfig, HttpTransport, JsonPost, ProviderBuildError};

/// Default base URL of the tour-planning service.
pub const DEFAULT_ROUTING_BASE_URL: &str = "https://tourplanning.hereapi.com";

const PROBLEMS_PATH: &str = "v2/problems";

/// [`RoutingService`] posting problems to `{base}/v2/problems`.
///
/// The API key travels in the `apiKey` query parameter and is stripped from
/// every URL that appears in errors or logs.
///
/// # Example
///
/// ```no_run
/// use tourplan_core::RoutingService;
/// use tourplan_data::routing::HereTourPlanningClient;
///
/// let client = HereTourPlanningClient::new("my-api-key")?;
/// let solution = client.submit(r#"{"id":"request1","fleet":{},"plan":{}}"#)?;
/// # let _ = solution;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct HereTourPlanningClient {
    transport: HttpTransport,
    endpoint: Url,
}

impl HereTourPlanningClient {
    /// Client for the public service with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: &str) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpClientConfig::new(DEFAULT_ROUTING_BASE_URL), api_key)
    }

    /// Client with explicit connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpClientConfig, api_key: &str) -> Result<Self, ProviderBuildError> {
        let mut endpoint = config.endpoint(PROBLEMS_PATH)?;
        endpoint.query_pairs_mut().append_pair("apiKey", api_key);
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            transport,
            endpoint,
        })
    }

    /// Connection settings in use.
    #[must_use]
    pub const fn config(&self) -> &HttpClientConfig {
        self.transport.config()
    }
}

impl RoutingService for HereTourPlanningClient {
    fn submit(&self, body: &str) -> Result<String, ServiceError> {
        if body.trim().is_empty() {
            return Err(ServiceError::EmptyInput);
        }
        log::debug!("posting {} byte problem", body.len());
        self.transport.post_json(&JsonPost {
            url: &self.endpoint,
            body,
            authorization: None,
        })
    }
}
