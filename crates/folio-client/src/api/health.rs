//! Health API.

use reqwest::header::HeaderMap;

use crate::client::FolioClient;
use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::types::HealthResponse;

/// Backend liveness endpoint.
const HEALTH_PATH: &str = "/health";

/// Health API client.
///
/// Probes go out without credentials and outside the session pipeline, so a
/// health check never rotates, refreshes or purges tokens.
pub struct HealthApi {
    client: FolioClient,
}

impl HealthApi {
    pub(crate) fn new(client: FolioClient) -> Self {
        Self { client }
    }

    /// Backend status and version.
    pub async fn check(&self) -> Result<HealthResponse> {
        let descriptor = RequestDescriptor::get(HEALTH_PATH);
        let response = self.client.transmit(&descriptor, HeaderMap::new()).await?;
        if !response.is_success() {
            return Err(response.into_error());
        }
        response.json()
    }

    pub async fn is_healthy(&self) -> bool {
        self.check().await.is_ok()
    }
}
