//! Configuration types for the Quay API client.

use std::time::Duration;

/// Hostname used when neither `--hostname` nor `QUAY_HOSTNAME` is set.
pub const DEFAULT_HOSTNAME: &str = "quay.io";

/// Path prefix of every API endpoint.
pub const API_PREFIX: &str = "/api/v1/";

/// Configuration for the Quay API client.
///
/// Built once at startup and handed to [`crate::QuayClient::new`]; nothing
/// in the client reads the environment.
#[derive(Debug, Clone)]
pub struct QuayConfig {
    /// Registry hostname (e.g., `quay.io`).
    pub hostname: String,

    /// API root, `https://<hostname>/api/v1/` unless overridden.
    pub base_url: String,

    /// OAuth bearer token. Requests are sent unauthenticated without one.
    pub token: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl QuayConfig {
    /// Creates a configuration for the given hostname.
    ///
    /// # Examples
    ///
    /// ```
    /// use qucli_client::QuayConfig;
    ///
    /// let config = QuayConfig::new("quay.io");
    /// assert_eq!(config.base_url, "https://quay.io/api/v1/");
    /// ```
    #[must_use]
    pub fn new(hostname: impl Into<String>) -> Self {
        let hostname = hostname.into();
        Self {
            base_url: format!("https://{hostname}{API_PREFIX}"),
            hostname,
            token: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("qucli/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the bearer token. Empty tokens are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use qucli_client::QuayConfig;
    ///
    /// let config = QuayConfig::new("quay.io").with_token("");
    /// assert!(config.token.is_none());
    /// ```
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    /// Overrides the API root, keeping `hostname` for display.
    ///
    /// Used to point the client at a plain-HTTP test server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for QuayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOSTNAME)
    }
}
