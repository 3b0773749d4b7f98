use crate::core::config::{ConfigError, TransportKind, DEFAULT_TIMEOUT};
use crate::core::errors::SerumError;
use crate::core::kernel::codec::status_to_error;
use crate::core::kernel::subscription::{forward, Subscription, DEFAULT_SUBSCRIPTION_BUFFER};
use crate::core::kernel::transport::{Operation, StreamOperation, Transport, UnaryOperation};
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, error, instrument};

#[derive(Debug, Clone)]
pub struct GrpcConfig {
    /// `host:port`, or a full `http(s)://` URI
    pub endpoint: String,
    /// Deadline for one unary call
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub subscription_buffer: usize,
}

impl GrpcConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            subscription_buffer: DEFAULT_SUBSCRIPTION_BUFFER,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn uri(&self) -> String {
        if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("http://{}", self.endpoint)
        }
    }
}

/// Protobuf transport over a gRPC channel
///
/// Operations are invoked by path on the `api.Api` service with a prost
/// codec, so no generated client stubs are needed.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    channel: Channel,
    config: GrpcConfig,
}

impl GrpcTransport {
    fn endpoint(config: &GrpcConfig) -> Result<Endpoint, SerumError> {
        Endpoint::from_shared(config.uri())
            .map(|endpoint| endpoint.connect_timeout(config.connect_timeout))
            .map_err(|e| {
                ConfigError::InvalidConfiguration(format!(
                    "Invalid gRPC endpoint '{}': {}",
                    config.endpoint, e
                ))
                .into()
            })
    }

    /// Create a transport that connects on first use
    pub fn connect_lazy(config: GrpcConfig) -> Result<Self, SerumError> {
        let channel = Self::endpoint(&config)?.connect_lazy();
        Ok(Self { channel, config })
    }

    /// Create a transport and establish the connection now
    #[instrument(skip(config), fields(transport = "grpc", endpoint = %config.endpoint))]
    pub async fn connect(config: GrpcConfig) -> Result<Self, SerumError> {
        let channel = Self::endpoint(&config)?
            .connect()
            .await
            .map_err(|e| SerumError::Connection(format!("gRPC connection failed: {}", e)))?;
        debug!("gRPC channel connected");
        Ok(Self { channel, config })
    }

    pub fn config(&self) -> &GrpcConfig {
        &self.config
    }

    async fn ready_client(&self) -> Result<Grpc<Channel>, SerumError> {
        let mut grpc = Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| SerumError::Connection(format!("gRPC channel not ready: {}", e)))?;
        Ok(grpc)
    }

    fn codec<O: Operation>() -> ProstCodec<O::Request, O::Response> {
        ProstCodec::default()
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Grpc
    }

    #[instrument(skip(self, request), fields(transport = "grpc", method = O::METHOD))]
    async fn unary<O: UnaryOperation>(
        &self,
        request: O::Request,
    ) -> Result<O::Response, SerumError> {
        let deadline = self.config.timeout;
        let call = async {
            let mut grpc = self.ready_client().await?;
            grpc.unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(O::GRPC_PATH),
                Self::codec::<O>(),
            )
            .await
            .map(tonic::Response::into_inner)
            .map_err(|status| status_to_error(&status, Some(deadline)))
        };

        tokio::time::timeout(deadline, call)
            .await
            .map_err(|_| SerumError::Timeout(deadline))?
    }

    #[instrument(skip(self, request, cancel), fields(transport = "grpc", method = O::METHOD))]
    async fn stream<O: StreamOperation>(
        &self,
        request: O::Request,
        cancel: CancellationToken,
    ) -> Result<Subscription<O::Response>, SerumError> {
        let deadline = self.config.timeout;
        let open = async {
            let mut grpc = self.ready_client().await?;
            grpc.server_streaming(
                tonic::Request::new(request),
                PathAndQuery::from_static(O::GRPC_PATH),
                Self::codec::<O>(),
            )
            .await
            .map(tonic::Response::into_inner)
            .map_err(|status| status_to_error(&status, Some(deadline)))
        };

        // only opening the stream is bounded, not its lifetime
        let streaming = tokio::time::timeout(deadline, open)
            .await
            .map_err(|_| SerumError::Timeout(deadline))??;

        Ok(Subscription::spawn(
            cancel.child_token(),
            self.config.subscription_buffer,
            move |output, cancel| relay_messages(streaming, output, cancel),
        ))
    }
}

/// Forward server-streamed messages until cancellation, EOF or error
///
/// The server ending the stream is reported to the consumer as
/// [`SerumError::StreamClosed`], never as silence.
pub(crate) async fn relay_messages<T, S>(
    source: S,
    output: mpsc::Sender<Result<T, SerumError>>,
    cancel: CancellationToken,
) -> Result<(), SerumError>
where
    T: Send + 'static,
    S: Stream<Item = Result<T, tonic::Status>> + Send + 'static,
{
    let mut source = Box::pin(source);

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            next = source.next() => next,
        };

        match next {
            Some(Ok(message)) => {
                if !forward(&output, &cancel, Ok(message)).await {
                    return Ok(());
                }
            }
            Some(Err(status)) => {
                error!(code = ?status.code(), "gRPC stream failed: {}", status.message());
                forward(&output, &cancel, Err(status_to_error(&status, None))).await;
                return Err(status_to_error(&status, None));
            }
            None => {
                let reason = "server ended the stream";
                debug!("{}", reason);
                forward(&output, &cancel, Err(SerumError::StreamClosed(reason.to_string()))).await;
                return Err(SerumError::StreamClosed(reason.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GetOrderbooksStreamResponse;

    fn update(slot: i64) -> Result<GetOrderbooksStreamResponse, tonic::Status> {
        Ok(GetOrderbooksStreamResponse {
            slot,
            orderbook: None,
        })
    }

    #[tokio::test]
    async fn test_end_of_stream_is_reported() {
        let source = futures::stream::iter(vec![update(1), update(2)]);
        let mut subscription =
            Subscription::spawn(CancellationToken::new(), 8, move |tx, cancel| {
                relay_messages(source, tx, cancel)
            });

        assert_eq!(subscription.recv().await.unwrap().unwrap().slot, 1);
        assert_eq!(subscription.recv().await.unwrap().unwrap().slot, 2);
        assert!(matches!(
            subscription.recv().await.unwrap(),
            Err(SerumError::StreamClosed(_))
        ));
        assert!(subscription.recv().await.is_none());
        assert!(matches!(
            subscription.close().await,
            Err(SerumError::StreamClosed(_))
        ));
    }

    #[tokio::test]
    async fn test_status_error_ends_stream() {
        let source = futures::stream::iter(vec![
            update(1),
            Err(tonic::Status::unavailable("connection reset")),
            update(3),
        ]);
        let mut subscription =
            Subscription::spawn(CancellationToken::new(), 8, move |tx, cancel| {
                relay_messages(source, tx, cancel)
            });

        assert!(subscription.recv().await.unwrap().is_ok());
        assert!(matches!(
            subscription.recv().await.unwrap(),
            Err(SerumError::Connection(_))
        ));
        assert!(subscription.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_cancellation_stops_pending_stream() {
        let token = CancellationToken::new();
        let source = futures::stream::pending::<Result<GetOrderbooksStreamResponse, tonic::Status>>();
        let mut subscription = Subscription::spawn(token.clone(), 8, move |tx, cancel| {
            relay_messages(source, tx, cancel)
        });

        token.cancel();
        let next = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
            .await
            .unwrap();
        assert!(next.is_none());
        assert!(subscription.close().await.is_ok());
    }

    #[test]
    fn test_endpoint_uri() {
        assert_eq!(
            GrpcConfig::new("localhost:9000").uri(),
            "http://localhost:9000"
        );
        assert_eq!(
            GrpcConfig::new("https://example.com:443").uri(),
            "https://example.com:443"
        );
    }

    #[tokio::test]
    async fn test_lazy_connect_does_not_dial() {
        let transport = GrpcTransport::connect_lazy(GrpcConfig::new("127.0.0.1:1")).unwrap();
        assert_eq!(transport.kind(), TransportKind::Grpc);
    }
}
