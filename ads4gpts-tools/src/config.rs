//! Client configuration.
//!
//! ## API Key
//!
//! The key can be provided directly or via the `ADS4GPTS_API_KEY`
//! environment variable. An explicit key always wins; if neither is present
//! the client refuses to build.
//!
//! The base URL defaults to [`DEFAULT_BASE_URL`] and can be overridden with
//! `ADS4GPTS_BASE_URL`.

use ads4gpts_core::AdError;
use std::env;
use std::time::Duration;
use url::Url;

use crate::retry::RetryPolicy;

/// Production ad API.
pub const DEFAULT_BASE_URL: &str = "https://with.ads4gpts.com";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ADS4GPTS_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "ADS4GPTS_BASE_URL";

/// Configuration for [`AdClient`](crate::AdClient).
#[derive(Debug, Clone)]
pub struct AdClientConfig {
    /// Explicit API key. Falls back to `ADS4GPTS_API_KEY` when `None`.
    pub api_key: Option<String>,
    /// Base URL of the ad API.
    pub base_url: String,
    /// Per-request timeout. `None` leaves the HTTP client default.
    pub timeout: Option<Duration>,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl Default for AdClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl AdClientConfig {
    /// Create a configuration with an explicit API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Create a configuration from the environment.
    ///
    /// Reads `ADS4GPTS_API_KEY` and `ADS4GPTS_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Config`] if no API key is set.
    pub fn from_env() -> Result<Self, AdError> {
        let mut config = Self::default();
        if let Some(base_url) = non_empty(env::var(BASE_URL_ENV).ok()) {
            config.base_url = base_url;
        }
        config.resolve_api_key()?;
        Ok(config)
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Resolve the API key: explicit value, then `ADS4GPTS_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Config`] if both are absent or blank.
    pub fn resolve_api_key(&self) -> Result<String, AdError> {
        self.resolve_api_key_with(|name| env::var(name).ok())
    }

    pub(crate) fn resolve_api_key_with<F>(&self, lookup: F) -> Result<String, AdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        non_empty(self.api_key.clone())
            .or_else(|| non_empty(lookup(API_KEY_ENV)))
            .ok_or_else(|| {
                AdError::config(format!(
                    "no API key provided and {API_KEY_ENV} environment variable not set"
                ))
            })
    }

    /// Parse and check the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AdError::Config`] if it is not an absolute http(s) URL.
    pub fn parsed_base_url(&self) -> Result<Url, AdError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| AdError::config(format!("invalid base URL '{}': {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AdError::config(format!(
                "unsupported base URL scheme '{other}'"
            ))),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.retry, RetryPolicy::no_retry());
    }

    #[test]
    fn test_builder() {
        let config = AdClientConfig::new("key")
            .with_base_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryPolicy::for_ads_api());

        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.retry.max_attempts, 5);
    }

    #[test]
    fn test_explicit_key_wins_over_env() {
        let config = AdClientConfig::new("explicit");
        let key = config
            .resolve_api_key_with(|_| Some("from-env".to_string()))
            .unwrap();
        assert_eq!(key, "explicit");
    }

    #[test]
    fn test_env_key_used_when_no_explicit() {
        let config = AdClientConfig::default();
        let key = config
            .resolve_api_key_with(|name| (name == API_KEY_ENV).then(|| "from-env".to_string()))
            .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = AdClientConfig::default().with_api_key("   ");
        let err = config.resolve_api_key_with(|_| None).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_base_url_validation() {
        assert!(AdClientConfig::default().parsed_base_url().is_ok());
        assert!(AdClientConfig::default()
            .with_base_url("not a url")
            .parsed_base_url()
            .is_err());
        assert!(AdClientConfig::default()
            .with_base_url("ftp://ads.example.com")
            .parsed_base_url()
            .is_err());
    }
}
