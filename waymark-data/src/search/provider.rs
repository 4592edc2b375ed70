//! HTTP-based `PlaceSearch` and `Geocoder` backed by a Nominatim endpoint.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use reqwest::Client;
use thiserror::Error;
use url::Url;
use waymark_core::{Geocoder, Place, PlaceSearch, SearchError, SearchRequest};

use super::nominatim::SearchResult;

/// Error type for [`HttpPlaceSearch`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL could not be parsed.
    #[error("invalid base URL {url:?}: {source}")]
    BaseUrl {
        /// The rejected base URL.
        url: String,
        /// Source error from the URL parser.
        #[source]
        source: url::ParseError,
    },
}

/// Default user agent for search requests.
///
/// Nominatim's usage policy requires an identifying agent; the provider
/// always sends one.
pub const DEFAULT_USER_AGENT: &str = "waymark/0.1";

/// Default search endpoint.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on the number of returned places.
const DEFAULT_RESULT_LIMIT: u32 = 20;

/// Metres per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Floor for the longitude scale factor so a centre near a pole cannot
/// blow the degree box up to infinity.
const MIN_LON_SCALE: f64 = 0.01;

/// Configuration for [`HttpPlaceSearch`].
#[derive(Debug, Clone)]
pub struct HttpPlaceSearchConfig {
    /// Base URL of the search service.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of places requested per search.
    pub result_limit: u32,
}

impl Default for HttpPlaceSearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

impl HttpPlaceSearchConfig {
    /// Create a configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
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

    /// Set the cap on returned places.
    #[must_use]
    pub const fn with_result_limit(mut self, result_limit: u32) -> Self {
        self.result_limit = result_limit;
        self
    }
}

/// Nominatim-backed place search and geocoder.
///
/// Search requests are bounded to a degree box derived from the request
/// radius at the centre's latitude; geocoding requests are unbounded and
/// capped to one result. Both use the same `search` endpoint in `jsonv2`
/// format.
#[derive(Debug, Clone)]
pub struct HttpPlaceSearch {
    client: Client,
    endpoint: Url,
    config: HttpPlaceSearchConfig,
}

impl HttpPlaceSearch {
    /// Create a provider against the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the HTTP client fails to build.
    pub fn new() -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpPlaceSearchConfig::default())
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the base URL does not parse or
    /// the HTTP client fails to build.
    pub fn with_config(config: HttpPlaceSearchConfig) -> Result<Self, ProviderBuildError> {
        let base = config.base_url.trim_end_matches('/');
        let endpoint =
            Url::parse(&format!("{base}/search")).map_err(|source| ProviderBuildError::BaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Build the bounded search URL for a request.
    fn search_url(&self, request: &SearchRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", request.query())
            .append_pair("format", "jsonv2")
            .append_pair("limit", &self.config.result_limit.to_string())
            .append_pair(
                "viewbox",
                &viewbox(request.center(), request.radius_meters()),
            )
            .append_pair("bounded", "1");
        url
    }

    /// Build the unbounded single-result geocoding URL for an address.
    fn geocode_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        url
    }

    async fn fetch(&self, url: Url) -> Result<Vec<SearchResult>, SearchError> {
        let display_url = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &display_url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &display_url))?;

        response.json().await.map_err(|err| SearchError::Parse {
            message: err.to_string(),
        })
    }

    /// Convert a reqwest error to a `SearchError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> SearchError {
        if error.is_timeout() {
            return SearchError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return SearchError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        SearchError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Degree box around `center` sized to `radius_meters`, formatted as the
/// `viewbox` parameter (`lon_min,lat_max,lon_max,lat_min`).
#[expect(
    clippy::float_arithmetic,
    reason = "converting a metre radius to a degree box"
)]
fn viewbox(center: Coord<f64>, radius_meters: f64) -> String {
    let lat_delta = radius_meters / METERS_PER_DEGREE;
    let lon_scale = center.y.to_radians().cos().max(MIN_LON_SCALE);
    let lon_delta = radius_meters / (METERS_PER_DEGREE * lon_scale);
    format!(
        "{},{},{},{}",
        center.x - lon_delta,
        center.y + lat_delta,
        center.x + lon_delta,
        center.y - lat_delta,
    )
}

#[async_trait]
impl PlaceSearch for HttpPlaceSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Place>, SearchError> {
        let records = self.fetch(self.search_url(request)).await?;
        records
            .into_iter()
            .map(SearchResult::into_place)
            .collect()
    }
}

#[async_trait]
impl Geocoder for HttpPlaceSearch {
    async fn geocode(&self, address: &str) -> Result<Option<Coord<f64>>, SearchError> {
        let records = self.fetch(self.geocode_url(address)).await?;
        records
            .into_iter()
            .next()
            .map(|record| record.into_place().map(|place| place.location))
            .transpose()
    }
}
