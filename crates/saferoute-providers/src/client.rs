//! Shared OpenRouteService HTTP client.

use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";
pub const DEFAULT_PROFILE: &str = "driving-car";

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    /// Directions profile, e.g. `driving-car`
    pub profile: String,
    pub timeout: Duration,
}

impl OrsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            profile: DEFAULT_PROFILE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the OpenRouteService APIs.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct OrsClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) profile: String,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            profile: config.profile,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.header("Authorization", self.api_key.as_str())
        }
    }
}

/// Describe a transport failure for logs and error payloads.
pub(crate) fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

/// Statuses that mean the service itself is unusable right now, as opposed
/// to rejecting this particular request.
pub(crate) fn is_service_failure(status: StatusCode) -> bool {
    status.is_server_error()
        || matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
        )
}
