/// Serum client kernel: transports, response decoding and signing
///
/// The kernel knows nothing about individual operations beyond what the
/// [`Operation`] descriptors tell it. Each transport carries the same typed
/// requests and responses over its own wire protocol.
///
/// # Transports
/// - [`HttpTransport`]: JSON over the HTTP gateway, request/response only
/// - [`WsTransport`]: JSON-RPC over one persistent WebSocket, requests and
///   subscriptions multiplexed by request id
/// - [`GrpcTransport`]: protobuf over a gRPC channel to the `api.Api` service
///
/// # Decoding
/// - [`codec`]: HTTP status/body decoding, the two-stage JSON-RPC frame
///   decoder and gRPC status mapping
///
/// # Streams
/// - [`Subscription`]: cancellable, ordered, unbounded item sequence backed
///   by a relay task
///
/// # Signing
/// - [`TxSigner`] / [`KeypairSigner`]: local ed25519 signing of server-built
///   transactions
///
/// # Usage
/// ```rust,no_run
/// use serum_client::core::kernel::*;
/// use serum_client::core::types::{GetOrderbookRequest, GetOrderbookResponse};
/// use serum_client::serum::operations::GetOrderbook;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let http = HttpTransport::new(HttpConfig::new("http://localhost:1809"))?;
/// let orderbook: GetOrderbookResponse = http
///     .unary::<GetOrderbook>(GetOrderbookRequest {
///         market: "SOL/USDC".to_string(),
///         limit: 0,
///     })
///     .await?;
/// println!("{} bids", orderbook.bids.len());
/// # Ok(())
/// # }
/// ```
pub mod codec;
pub mod grpc;
pub mod rest;
pub mod signer;
pub mod subscription;
pub mod transport;
pub mod ws;

// Re-export key types for convenience
pub use grpc::{GrpcConfig, GrpcTransport};
pub use rest::{HttpConfig, HttpTransport, HttpTransportBuilder};
pub use signer::{KeypairSigner, TxSigner};
pub use subscription::Subscription;
pub use transport::{HttpRoute, Operation, StreamOperation, Transport, UnaryOperation};
pub use ws::{WsConfig, WsTransport};
