use crate::core::config::TransportKind;
use crate::core::errors::SerumError;
use crate::core::kernel::subscription::Subscription;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Describes one remote operation independently of the wire protocol
///
/// The same request and response types travel as a JSON body or query
/// string over HTTP, as JSON-RPC params over WebSocket and as protobuf
/// messages over gRPC.
pub trait Operation: Send + Sync + 'static {
    type Request: prost::Message + Serialize + Clone + Send + Sync + 'static;
    type Response: prost::Message + Default + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// JSON-RPC method name, also the gRPC method name
    const METHOD: &'static str;

    /// Full gRPC path, e.g. `/api.Api/GetOrderbook`
    const GRPC_PATH: &'static str;
}

/// An operation with exactly one response
pub trait UnaryOperation: Operation {
    /// HTTP method, path and query for this request
    fn http_route(request: &Self::Request) -> HttpRoute;
}

/// An operation that pushes an open-ended sequence of responses
pub trait StreamOperation: Operation {}

/// HTTP request shape of a unary operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRoute {
    pub method: Method,
    pub path: &'static str,
    /// Trailing path segments, percent-encoded individually
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
}

impl HttpRoute {
    pub fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path)
    }

    fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            segments: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn has_body(&self) -> bool {
        self.method == Method::POST
    }
}

/// Unified request/response contract implemented by every transport
///
/// Unary calls are bounded by the transport's configured timeout. Streams
/// are unbounded and stop only when `cancel` fires, the returned
/// [`Subscription`] is closed or dropped, or the connection fails.
#[async_trait]
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn unary<O: UnaryOperation>(&self, request: O::Request) -> Result<O::Response, SerumError>;

    async fn stream<O: StreamOperation>(
        &self,
        request: O::Request,
        cancel: CancellationToken,
    ) -> Result<Subscription<O::Response>, SerumError>;
}
