// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the `MimoMesh` device API.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::model::{DeviceConfig, DeviceStatus};

/// HTTP client for communicating with a `MimoMesh` device.
///
/// The client is stateless beyond the configured base URL and a fixed
/// header set; it is cheap to clone and safe to share between callers.
/// Connection resources live in reqwest's pool and are released when the
/// last clone is dropped, on every exit path.
///
/// # Examples
///
/// ```no_run
/// use mimomesh_lib::MeshClient;
///
/// # async fn example() -> mimomesh_lib::Result<()> {
/// let client = MeshClient::new("192.168.1.87")?;
/// let status = client.fetch_status().await?;
/// println!("{} nodes visible", status.node_number);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MeshClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl MeshClient {
    /// Default request timeout, matching the device's documented response
    /// budget.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a new client for the device at the given base URL.
    ///
    /// A bare host or IP is accepted; `http://` is assumed when no scheme
    /// is present. Trailing slashes are stripped so endpoint paths join
    /// cleanly.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the base URL is empty or the
    /// HTTP stack cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        MeshClientBuilder::new().base_url(base_url).build()
    }

    /// Returns the normalized base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches the live device status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, a non-success
    /// HTTP status, or an undecodable body.
    pub async fn fetch_status(&self) -> Result<DeviceStatus, ApiError> {
        self.get_json("status").await
    }

    /// Fetches the device configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, a non-success
    /// HTTP status, or an undecodable body.
    pub async fn fetch_config(&self) -> Result<DeviceConfig, ApiError> {
        self.get_json("config").await
    }

    /// Fetches the device version report as an opaque JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, a non-success
    /// HTTP status, or an undecodable body.
    pub async fn fetch_version(&self) -> Result<Value, ApiError> {
        self.get_opaque("version").await
    }

    /// Fetches the current spectrum sweep as an opaque JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, a non-success
    /// HTTP status, or an undecodable body.
    pub async fn fetch_spectrum(&self) -> Result<Value, ApiError> {
        self.get_opaque("spectrum").await
    }

    /// Applies a configuration update via `POST /config`.
    ///
    /// Returns the decoded response body; an empty body is a success and
    /// decodes to an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, a non-success
    /// HTTP status, or an undecodable body.
    pub async fn apply_config(&self, update: &Map<String, Value>) -> Result<Value, ApiError> {
        let url = self.endpoint("config");

        tracing::debug!(url = %url, fields = update.len(), "Applying device configuration");

        let response = self
            .client
            .post(&url)
            .json(update)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body = self.read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Builds the full URL for an endpoint path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.get_body(path).await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_opaque(&self, path: &str) -> Result<Value, ApiError> {
        let body = self.get_body(path).await?;
        if body.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_body(&self, path: &str) -> Result<String, ApiError> {
        let url = self.endpoint(path);

        tracing::debug!(url = %url, "Sending device GET request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_body(response).await
    }

    /// Reads the body, turning non-success statuses into `RemoteRejected`
    /// with the body preserved for diagnostics.
    async fn read_body(&self, response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ApiError::RemoteRejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(body = %body, "Received device response");
        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            ApiError::Unreachable(err.to_string())
        }
    }
}

/// Builder for creating a [`MeshClient`] with custom configuration.
#[derive(Debug, Default)]
pub struct MeshClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl MeshClientBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device base URL (bare host, or full `http(s)://` URL).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the base URL is missing or
    /// empty, or if the HTTP stack cannot be initialized.
    pub fn build(self) -> Result<MeshClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::InvalidConfig("base URL is required".to_string()))?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfig("base URL is empty".to_string()));
        }

        let base_url = if base_url.starts_with("http://") || base_url.starts_with("https://") {
            base_url
        } else {
            format!("http://{base_url}")
        };

        let timeout = self.timeout.unwrap_or(MeshClient::DEFAULT_TIMEOUT);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(MeshClient {
            base_url,
            client,
            timeout,
        })
    }
}
