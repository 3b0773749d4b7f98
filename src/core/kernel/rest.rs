use crate::core::config::{ConfigError, TransportKind, DEFAULT_TIMEOUT};
use crate::core::errors::SerumError;
use crate::core::kernel::codec;
use crate::core::kernel::subscription::Subscription;
use crate::core::kernel::transport::{HttpRoute, StreamOperation, Transport, UnaryOperation};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, trace};

/// Configuration for the HTTP transport
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Base URL of the gateway, e.g. `https://virginia.solana.dex.blxrbdn.com`
    pub base_url: String,
    /// Deadline for one request, including reading the body
    pub timeout: Duration,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("serum-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Builder for [`HttpTransport`]
pub struct HttpTransportBuilder {
    config: HttpConfig,
    client: Option<Client>,
}

impl HttpTransportBuilder {
    pub fn new(config: HttpConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Use a caller-supplied reqwest client instead of building one
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<HttpTransport, SerumError> {
        let base = Url::parse(&self.config.base_url).map_err(|e| {
            ConfigError::InvalidConfiguration(format!(
                "Invalid HTTP endpoint '{}': {}",
                self.config.base_url, e
            ))
        })?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidConfiguration(format!(
                "HTTP endpoint '{}' cannot carry a path",
                self.config.base_url
            ))
            .into());
        }

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .connect_timeout(self.config.timeout)
                .user_agent(&self.config.user_agent)
                .build()
                .map_err(|e| {
                    ConfigError::InvalidConfiguration(format!(
                        "Failed to build HTTP client: {}",
                        e
                    ))
                })?,
        };

        Ok(HttpTransport {
            client,
            base,
            config: self.config,
        })
    }
}

/// Request/response transport over the JSON HTTP gateway
///
/// Read operations are `GET` with path segments and query parameters;
/// write operations are `POST` with a JSON body. Server push is not
/// available over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
    config: HttpConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self, SerumError> {
        HttpTransportBuilder::new(config).build()
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Build the full URL for a route
    ///
    /// Every trailing segment is percent-encoded on its own, so a market
    /// name such as `SOL/USDC` stays one segment.
    pub fn build_url(&self, route: &HttpRoute) -> Result<Url, SerumError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                SerumError::InvalidParameters(format!(
                    "Base URL '{}' cannot carry a path",
                    self.base
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(route.path.split('/').filter(|s| !s.is_empty()))
                .extend(route.segments.iter());
        }

        if !route.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(route.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    fn map_send_error(&self, error: &reqwest::Error) -> SerumError {
        if error.is_timeout() {
            SerumError::Timeout(self.config.timeout)
        } else {
            SerumError::Connection(format!("HTTP request failed: {}", error))
        }
    }

    #[instrument(skip(self, request), fields(transport = "http", method = O::METHOD))]
    async fn execute<O: UnaryOperation>(
        &self,
        request: &O::Request,
    ) -> Result<O::Response, SerumError> {
        let route = O::http_route(request);
        let url = self.build_url(&route)?;
        trace!(%url, "Sending request");

        let mut builder = self.client.request(route.method.clone(), url);
        if route.has_body() {
            let body = serde_json::to_vec(request).map_err(|e| {
                SerumError::Serialization(format!("Failed to encode {} body: {}", O::METHOD, e))
            })?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        trace!(status = status.as_u16(), "Response body: {}", body);

        codec::decode_http(status.as_u16(), &body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn unary<O: UnaryOperation>(
        &self,
        request: O::Request,
    ) -> Result<O::Response, SerumError> {
        tokio::time::timeout(self.config.timeout, self.execute::<O>(&request))
            .await
            .map_err(|_| SerumError::Timeout(self.config.timeout))?
    }

    async fn stream<O: StreamOperation>(
        &self,
        _request: O::Request,
        _cancel: CancellationToken,
    ) -> Result<Subscription<O::Response>, SerumError> {
        Err(SerumError::StreamingUnsupported(TransportKind::Http.as_str()))
    }
}
