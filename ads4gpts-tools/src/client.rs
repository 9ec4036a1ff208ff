//! HTTP client for the ad API.
//!
//! Every public retrieval method returns an [`AdResponse`]: validation,
//! transport, status and decoding failures are logged and converted to the
//! `{"error": ...}` shape instead of being returned as `Err`. Only building
//! the client can fail.
//!
//! ## Example
//!
//! ```ignore
//! use ads4gpts_tools::{AdClient, AdClientConfig, AdRequest};
//!
//! let client = AdClient::new(AdClientConfig::from_env()?)?;
//! let request = AdRequest::new("sess_1", "outdoor gear", "gambling", "hiking trip");
//! let response = client.get_ads(&request).await;
//! println!("{}", response.to_json());
//! ```

use ads4gpts_core::AdError;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error};

use crate::config::AdClientConfig;
use crate::request::AdRequest;
use crate::response::AdResponse;
use crate::retry::RetryPolicy;
use crate::surface::AdSurface;

/// Client for the ad API, usable from async and blocking code.
///
/// Cloning is cheap; clones share connection pools.
#[derive(Clone)]
pub struct AdClient {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
    retry: RetryPolicy,
    http: reqwest::Client,
    blocking: Arc<OnceLock<reqwest::blocking::Client>>,
}

impl fmt::Debug for AdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl AdClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Config`] if no API key can be resolved, the base
    /// URL is unusable or the HTTP client cannot be built.
    pub fn new(config: AdClientConfig) -> Result<Self, AdError> {
        let api_key = config.resolve_api_key()?;
        Self::build(config, api_key)
    }

    /// Build a client from `ADS4GPTS_API_KEY` and `ADS4GPTS_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Same as [`AdClient::new`].
    pub fn from_env() -> Result<Self, AdError> {
        Self::new(AdClientConfig::from_env()?)
    }

    fn build(config: AdClientConfig, api_key: String) -> Result<Self, AdError> {
        config.parsed_base_url()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AdError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            retry: config.retry,
            http,
            blocking: Arc::new(OnceLock::new()),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Retry policy in use.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn into_response(err: AdError) -> AdResponse {
        error!(error = %err, "Ad retrieval failed");
        AdResponse::from(err)
    }

    /// Fetch ads for a typed request.
    pub async fn get_ads(&self, request: &AdRequest) -> AdResponse {
        self.try_get_ads(request.ad_format.endpoint(), request)
            .await
            .map_or_else(Self::into_response, AdResponse::Ads)
    }

    /// Fetch ads for untyped tool arguments on a surface.
    ///
    /// Arguments that fail validation never reach the network.
    pub async fn get_ads_from_args(&self, surface: &AdSurface, args: JsonValue) -> AdResponse {
        let request = match request_for(surface, args) {
            Ok(request) => request,
            Err(err) => return Self::into_response(err),
        };
        self.try_get_ads(&surface.endpoint, &request)
            .await
            .map_or_else(Self::into_response, AdResponse::Ads)
    }

    /// Fetch ads, keeping failures as `Err`.
    ///
    /// # Errors
    ///
    /// Returns the validation, transport, status or decoding error.
    pub async fn try_get_ads(
        &self,
        endpoint: &str,
        request: &AdRequest,
    ) -> Result<JsonValue, AdError> {
        request.validate()?;
        let body = request.to_body()?;
        let url = self.url_for(endpoint);
        debug!(
            url = %url,
            format = %request.ad_format,
            num_ads = request.num_ads,
            "Requesting ads"
        );

        self.retry.run(|| self.post(&url, &body)).await
    }

    async fn post(&self, url: &str, body: &JsonValue) -> Result<JsonValue, AdError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AdError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdError::transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| AdError::decode(e.to_string()))
    }

    /// Blocking variant of [`AdClient::get_ads`].
    ///
    /// Must not be called from inside an async runtime.
    pub fn get_ads_blocking(&self, request: &AdRequest) -> AdResponse {
        self.try_get_ads_blocking(request.ad_format.endpoint(), request)
            .map_or_else(Self::into_response, AdResponse::Ads)
    }

    /// Blocking variant of [`AdClient::get_ads_from_args`].
    pub fn get_ads_from_args_blocking(&self, surface: &AdSurface, args: JsonValue) -> AdResponse {
        let request = match request_for(surface, args) {
            Ok(request) => request,
            Err(err) => return Self::into_response(err),
        };
        self.try_get_ads_blocking(&surface.endpoint, &request)
            .map_or_else(Self::into_response, AdResponse::Ads)
    }

    /// Blocking variant of [`AdClient::try_get_ads`].
    ///
    /// # Errors
    ///
    /// Same as [`AdClient::try_get_ads`].
    pub fn try_get_ads_blocking(
        &self,
        endpoint: &str,
        request: &AdRequest,
    ) -> Result<JsonValue, AdError> {
        request.validate()?;
        let body = request.to_body()?;
        let url = self.url_for(endpoint);
        let http = self.blocking_client()?;
        debug!(
            url = %url,
            format = %request.ad_format,
            num_ads = request.num_ads,
            "Requesting ads (blocking)"
        );

        self.retry.run_blocking(|| self.post_blocking(http, &url, &body))
    }

    fn blocking_client(&self) -> Result<&reqwest::blocking::Client, AdError> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AdError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(self.blocking.get_or_init(|| client))
    }

    fn post_blocking(
        &self,
        http: &reqwest::blocking::Client,
        url: &str,
        body: &JsonValue,
    ) -> Result<JsonValue, AdError> {
        let response = http
            .post(url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .map_err(|e| AdError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(status_error(status, &text));
        }

        let bytes = response
            .bytes()
            .map_err(|e| AdError::transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| AdError::decode(e.to_string()))
    }
}

/// Parse arguments for `surface`, defaulting the format to the surface's.
fn request_for(surface: &AdSurface, args: JsonValue) -> Result<AdRequest, AdError> {
    let request = AdRequest::from_args(args, surface.format)?;
    if request.ad_format != surface.format {
        return Err(AdError::validation(
            "ad_format",
            format!(
                "{} only serves {} ads, got {}",
                surface.name, surface.format, request.ad_format
            ),
        ));
    }
    Ok(request)
}

fn status_error(status: StatusCode, body: &str) -> AdError {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let body = body.trim();
    if body.is_empty() || body == reason {
        AdError::http(status.as_u16(), reason)
    } else {
        AdError::http(status.as_u16(), format!("{reason}: {body}"))
    }
}
