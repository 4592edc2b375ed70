//! Dormant business-directory lookup.
//!
//! Resolves a business name and free-text location to a directory
//! identifier. This collaborator is isolated behind its own trait and the
//! off-by-default `directory` feature: nothing in the reconciliation flow
//! references it, and its identifiers never mix with [`waymark_core::PlaceId`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::search::ProviderBuildError;

/// Identifier assigned to a business by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BusinessId(String);

impl BusinessId {
    /// Wrap a directory identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Errors from [`DirectoryLookup::find_business`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The request never completed.
    #[error("directory request to {url} failed: {message}")]
    Network {
        /// The requested URL.
        url: String,
        /// Transport-level detail.
        message: String,
    },
    /// The directory answered with an error status.
    #[error("directory request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Service-supplied detail.
        message: String,
    },
    /// The response payload could not be decoded.
    #[error("failed to parse directory response: {message}")]
    Parse {
        /// Decoding detail.
        message: String,
    },
}

/// Look up a business identifier by name and location.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Return the first matching business, or `None` when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] on network, service, or decoding failure.
    async fn find_business(
        &self,
        name: &str,
        location: &str,
    ) -> Result<Option<BusinessId>, DirectoryError>;
}

/// Business search response payload.
#[derive(Debug, Deserialize)]
pub struct BusinessSearchResponse {
    /// Matches in the service's relevance order.
    pub businesses: Vec<BusinessRecord>,
}

/// One business in a search response.
#[derive(Debug, Deserialize)]
pub struct BusinessRecord {
    /// Directory identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Address components.
    pub location: BusinessLocation,
    /// Opening hours, when published.
    #[serde(default)]
    pub hours: Option<Vec<BusinessHours>>,
}

/// Address components of a business record.
#[derive(Debug, Deserialize)]
pub struct BusinessLocation {
    /// Street address line.
    pub address1: String,
    /// City name.
    pub city: String,
    /// State or region code.
    pub state: String,
    /// Country code.
    pub country: String,
    /// Postal code.
    pub zip_code: String,
}

/// Published opening hours for a business.
#[derive(Debug, Deserialize)]
pub struct BusinessHours {
    /// Open intervals, when published.
    #[serde(default)]
    pub open: Option<Vec<OpenInterval>>,
}

/// One open interval in a business's hours.
#[derive(Debug, Deserialize)]
pub struct OpenInterval {
    /// Opening time as `HHMM`.
    pub start: String,
    /// Closing time as `HHMM`.
    pub end: String,
}

/// Bearer-token HTTP client for a business-directory search endpoint.
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpDirectoryClient {
    /// Create a client against the given service with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the HTTP client fails to build.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    fn search_url(&self, name: &str, location: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let mut url = format!("{base}/v3/businesses/search");
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("term", name)
            .append_pair("location", location)
            .finish();
        url.push('?');
        url.push_str(&query);
        url
    }
}

#[async_trait]
impl DirectoryLookup for HttpDirectoryClient {
    async fn find_business(
        &self,
        name: &str,
        location: &str,
    ) -> Result<Option<BusinessId>, DirectoryError> {
        let url = self.search_url(name, location);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url))?;

        let payload: BusinessSearchResponse =
            response.json().await.map_err(|err| DirectoryError::Parse {
                message: err.to_string(),
            })?;

        Ok(payload
            .businesses
            .into_iter()
            .next()
            .map(|business| BusinessId::new(business.id)))
    }
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> DirectoryError {
    if let Some(status) = error.status() {
        return DirectoryError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    DirectoryError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}
