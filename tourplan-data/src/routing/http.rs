//! Blocking HTTP transport shared by the routing and directions clients.
//!
//! The service traits in `tourplan-core` are synchronous so the core stays
//! embeddable in synchronous callers. [`HttpTransport`] bridges them to
//! `reqwest` by blocking on a Tokio runtime it owns.

use std::thread;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tourplan_core::ServiceError;
use url::Url;

/// Error type for HTTP client construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
    /// The configured base URL is not a valid URL.
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
            Self::InvalidUrl { url, source } => write!(f, "invalid base URL {url}: {source}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::InvalidUrl { source, .. } => Some(source),
        }
    }
}

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = concat!("tourplan/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retries after a timeout or network failure.
pub const DEFAULT_RETRIES: u32 = 2;

const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Connection settings for an HTTP-backed service client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base URL of the service, without a trailing path.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Retries after a transient failure. Status errors are never retried.
    pub retries: u32,
    /// Delay before the first retry; doubled for each further attempt.
    pub backoff: Duration,
}

impl HttpClientConfig {
    /// Create a configuration for `base_url` with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the number of retries after transient failures.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the initial retry delay.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Join `path` onto the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError::InvalidUrl`] if the result does not
    /// parse.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ProviderBuildError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|source| ProviderBuildError::InvalidUrl {
            url: joined,
            source,
        })
    }
}

/// A JSON `POST` to send through [`HttpTransport`].
pub(crate) struct JsonPost<'a> {
    pub url: &'a Url,
    pub body: &'a str,
    pub authorization: Option<&'a str>,
}

/// `reqwest` client plus the runtime it is driven on.
///
/// When called from outside any Tokio runtime, or from a `current_thread`
/// runtime, requests run on the owned runtime. Inside a multi-threaded
/// runtime the caller's handle is used with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
pub(crate) struct HttpTransport {
    client: Client,
    config: HttpClientConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpTransport {
    pub(crate) fn new(config: HttpClientConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    pub(crate) const fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send `post`, retrying transient failures, and return the body.
    pub(crate) fn post_json(&self, post: &JsonPost<'_>) -> Result<String, ServiceError> {
        let shown = redacted(post.url);
        with_retries(self.config.retries, self.config.backoff, &shown, || {
            let future = self.send(post, &shown);
            match Handle::try_current() {
                Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                    tokio::task::block_in_place(|| handle.block_on(future))
                }
                _ => self.runtime.block_on(future),
            }
        })
    }

    async fn send(&self, post: &JsonPost<'_>, shown: &str) -> Result<String, ServiceError> {
        let mut request = self
            .client
            .post(post.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(post.body.to_owned());
        if let Some(key) = post.authorization {
            request = request.header(AUTHORIZATION, key);
        }
        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, shown))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, shown))?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                url: shown.to_owned(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> ServiceError {
        if error.is_timeout() {
            return ServiceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        ServiceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// The URL without its query string, which may carry an API key.
pub(crate) fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}

/// Run `attempt` until it succeeds, fails permanently or runs out of
/// retries. The delay starts at `backoff` and doubles after each retry.
pub(crate) fn with_retries<T>(
    retries: u32,
    backoff: Duration,
    url: &str,
    mut attempt: impl FnMut() -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let mut delay = backoff;
    let mut remaining = retries;
    loop {
        match attempt() {
            Err(err) if err.is_transient() && remaining > 0 => {
                log::warn!("request to {url} failed ({err}); retrying in {delay:?}");
                thread::sleep(delay);
                delay = delay.saturating_mul(2);
                remaining -= 1;
            }
            outcome => return outcome,
        }
    }
}
