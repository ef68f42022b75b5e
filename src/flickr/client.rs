// Flickr REST API HTTP client.
// Handles the API key, default query parameters, timeouts and status mapping.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::trace;

use crate::cache::FetchError;
use crate::error::{FramesError, Result};
use crate::model::Category;

const FLICKR_REST_URL: &str = "https://api.flickr.com/services/rest/";

/// Default photos per page, as the feed always requested.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Flickr API client restricted to a closed set of categories.
pub struct FlickrClient {
    client: Client,
    api_key: String,
    per_page: u32,
    categories: Vec<Category>,
}

impl FlickrClient {
    /// Create a new client with the given API key.
    pub fn new(
        api_key: &str,
        per_page: u32,
        timeout: Duration,
        categories: Vec<Category>,
    ) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(FramesError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("frames/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FramesError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            per_page: per_page.max(1),
            categories,
        })
    }

    /// Create a client from the FLICKR_API_KEY environment variable.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("FLICKR_API_KEY").map_err(|_| FramesError::MissingApiKey)?;
        Self::new(&key, DEFAULT_PER_PAGE, DEFAULT_TIMEOUT, Category::defaults())
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Whether the remote knows this category.
    pub fn supports(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    /// Make a GET request with method-specific query parameters.
    pub(super) async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        params: &T,
    ) -> std::result::Result<Response, FetchError> {
        let per_page = self.per_page.to_string();
        let defaults = [
            ("api_key", self.api_key.as_str()),
            ("format", "json"),
            ("nojsoncallback", "1"),
            ("extras", "url_s"),
            ("per_page", per_page.as_str()),
        ];

        let response = self
            .client
            .get(FLICKR_REST_URL)
            .query(&defaults)
            .query(params)
            .send()
            .await
            .map_err(classify_transport_error)?;

        trace!(status = %response.status(), "Flickr response");
        match classify_status(response.status()) {
            None => Ok(response),
            Some(err) => Err(err),
        }
    }
}

/// Map a non-success HTTP status to a fetch failure.
pub(super) fn classify_status(status: StatusCode) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }
    let reason = format!("HTTP {}", status);
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        Some(FetchError::Transient(reason))
    } else {
        Some(FetchError::Permanent(reason))
    }
}

/// Map a transport error. Only malformed requests are permanent.
pub(super) fn classify_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        FetchError::Permanent(error.to_string())
    } else {
        FetchError::Transient(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(classify_status(StatusCode::OK).is_none());
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS).unwrap().is_transient());
        assert!(classify_status(StatusCode::BAD_GATEWAY).unwrap().is_transient());
        assert!(classify_status(StatusCode::SERVICE_UNAVAILABLE).unwrap().is_transient());
        assert!(!classify_status(StatusCode::NOT_FOUND).unwrap().is_transient());
        assert!(!classify_status(StatusCode::FORBIDDEN).unwrap().is_transient());
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = FlickrClient::new("  ", 20, DEFAULT_TIMEOUT, Category::defaults());
        assert!(matches!(result, Err(FramesError::MissingApiKey)));
    }

    #[test]
    fn test_supports_closed_set() {
        let client = FlickrClient::new(
            "key",
            20,
            DEFAULT_TIMEOUT,
            vec![Category::all(), Category::new("Animals").unwrap()],
        )
        .unwrap();
        assert!(client.supports(&Category::all()));
        assert!(client.supports(&Category::new("Animals").unwrap()));
        assert!(client.supports(&Category::new("animals").unwrap()));
        assert!(!client.supports(&Category::new("Cars").unwrap()));
    }
}
