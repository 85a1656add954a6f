//! HTTP client for the SafeRoute planning API.

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use saferoute_core::{LocationDescriptor, RoutePlanRequest, RoutePlanResponse};

pub struct PlanningClient {
    client: Client,
    base_url: String,
}

impl PlanningClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Ask the server for a safe route.
    ///
    /// Planning failures still come back as a response; only transport
    /// errors and unexpected statuses are errors here.
    pub async fn plan(
        &self,
        start: LocationDescriptor,
        end: LocationDescriptor,
    ) -> Result<RoutePlanResponse> {
        let url = format!("{}/v1/routes/plan", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RoutePlanRequest { start, end })
            .send()
            .await
            .with_context(|| format!("sending plan request to {}", url))?;

        let status = response.status();
        match status {
            StatusCode::OK | StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_GATEWAY => response
                .json::<RoutePlanResponse>()
                .await
                .context("parsing plan response"),
            _ => {
                let body = response.text().await.unwrap_or_default();
                bail!("server returned {}: {}", status, body)
            }
        }
    }
}
