//! HTTP-based `DistanceProvider` using OSRM's Route API.
//!
//! The [`DistanceProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally.

use std::time::Duration;

use fleetroute_core::{DistanceError, DistanceMatrix, DistanceProvider};
use geo::Coord;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::assemble::{AssemblyOptions, assemble_matrix};
use super::osrm::RouteResponse;

/// Error type for [`HttpDistanceProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "fleetroute-routing/0.1";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`HttpDistanceProvider`].
#[derive(Debug, Clone)]
pub struct HttpDistanceProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM routing profile, e.g. `"driving"`.
    pub profile: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of route queries in flight at once.
    pub max_in_flight: usize,
    /// Attempts per pair for transient failures, including the first.
    pub max_attempts: u32,
    /// Base pause between attempts, multiplied by the attempt number.
    pub retry_backoff: Duration,
    /// Optional bound on assembling the whole matrix.
    pub deadline: Option<Duration>,
}

impl Default for HttpDistanceProviderConfig {
    fn default() -> Self {
        let assembly = AssemblyOptions::default();
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: "driving".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_in_flight: assembly.max_in_flight,
            max_attempts: assembly.max_attempts,
            retry_backoff: assembly.retry_backoff,
            deadline: assembly.deadline,
        }
    }
}

impl HttpDistanceProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the OSRM routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the in-flight request window.
    #[must_use]
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Set the number of attempts per pair.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base retry backoff.
    #[must_use]
    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Bound the whole matrix build.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            max_in_flight: self.max_in_flight,
            max_attempts: self.max_attempts,
            retry_backoff: self.retry_backoff,
            deadline: self.deadline,
        }
    }
}

/// HTTP-based distance provider using the OSRM Route API.
///
/// Each off-diagonal cell of the matrix is priced by one route query between
/// the two locations, so asymmetric road networks are preserved. The
/// provider owns a Tokio runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// A `current_thread` runtime cannot host a nested `block_on`, so from such
/// a runtime the request runs on the provider's own runtime inside a scoped
/// helper thread. The calling thread blocks until the matrix is ready.
pub struct HttpDistanceProvider {
    client: Client,
    config: HttpDistanceProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpDistanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDistanceProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpDistanceProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpDistanceProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpDistanceProviderConfig) -> Result<Self, ProviderBuildError> {
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

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &HttpDistanceProviderConfig {
        &self.config
    }

    /// Build the OSRM Route API URL for one ordered pair.
    ///
    /// The URL format is
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}?overview=false`.
    fn route_url(&self, from: Coord<f64>, to: Coord<f64>) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.x,
            from.y,
            to.x,
            to.y
        )
    }

    /// Price a single arc.
    async fn fetch_distance(
        &self,
        locations: &[Coord<f64>],
        from: usize,
        to: usize,
    ) -> Result<u64, DistanceError> {
        let (Some(&origin), Some(&destination)) = (locations.get(from), locations.get(to)) else {
            return Err(DistanceError::DimensionMismatch {
                expected: locations.len(),
                found: from.max(to) + 1,
            });
        };
        let url = self.route_url(origin, destination);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        let route: RouteResponse =
            response
                .json()
                .await
                .map_err(|err| DistanceError::ParseError {
                    message: err.to_string(),
                })?;

        route.into_distance(from, to)
    }

    /// Convert a reqwest error to a `DistanceError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> DistanceError {
        if error.is_timeout() {
            return DistanceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return DistanceError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        DistanceError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    async fn fetch_matrix_async(
        &self,
        locations: &[Coord<f64>],
    ) -> Result<DistanceMatrix, DistanceError> {
        log::debug!(
            "requesting {} route queries from {}",
            locations.len().saturating_mul(locations.len().saturating_sub(1)),
            self.config.base_url
        );
        assemble_matrix(
            locations.len(),
            &self.config.assembly_options(),
            |from, to| self.fetch_distance(locations, from, to),
        )
        .await
    }
}

impl DistanceProvider for HttpDistanceProvider {
    /// Fetch the distance matrix for the given locations.
    ///
    /// # Runtime requirements
    ///
    /// Inside a multi-threaded Tokio runtime the caller's runtime drives the
    /// requests through [`tokio::task::block_in_place`]. Inside a
    /// `current_thread` runtime they run on the provider's own runtime on a
    /// scoped helper thread. Outside any runtime the provider's runtime is
    /// used directly.
    fn distance_matrix(&self, locations: &[Coord<f64>]) -> Result<DistanceMatrix, DistanceError> {
        if locations.is_empty() {
            return Err(DistanceError::EmptyInput);
        }

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(self.fetch_matrix_async(locations)))
            }
            Ok(_) => std::thread::scope(|scope| {
                let worker =
                    scope.spawn(|| self.runtime.block_on(self.fetch_matrix_async(locations)));
                worker
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            }),
            Err(_) => self.runtime.block_on(self.fetch_matrix_async(locations)),
        }
    }
}
