use std::fmt::Debug;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://localhost:4000/legal-advice-stream";

/// Builder for [`HttpConfig`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct HttpConfigBuilder {
    endpoint: Option<String>,
    connect_timeout: Option<Duration>,
    no_proxy: bool,
}

impl HttpConfigBuilder {
    /// Creates a builder with all defaults.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL that questions are posted to.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Limits how long establishing a connection may take.
    ///
    /// Only the connect phase is bounded. Once the service accepted the
    /// question, the answer may stream for as long as it needs.
    #[inline]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Ignores proxies configured by the system.
    #[inline]
    pub fn without_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpConfig {
        HttpConfig {
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            connect_timeout: self.connect_timeout,
            no_proxy: self.no_proxy,
        }
    }
}

impl Debug for HttpConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfigBuilder")
            .field("endpoint", &self.endpoint)
            .field("connect_timeout", &self.connect_timeout)
            .field("no_proxy", &self.no_proxy)
            .finish()
    }
}

/// Configuration for the HTTP transport.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HttpConfig {
    pub(crate) endpoint: String,
    pub(crate) connect_timeout: Option<Duration>,
    pub(crate) no_proxy: bool,
}

impl HttpConfig {
    /// Returns the URL that questions are posted to.
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("endpoint", &self.endpoint)
            .field("connect_timeout", &self.connect_timeout)
            .field("no_proxy", &self.no_proxy)
            .finish()
    }
}
