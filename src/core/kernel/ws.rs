use crate::core::config::{TransportKind, DEFAULT_TIMEOUT};
use crate::core::errors::SerumError;
use crate::core::kernel::codec::{self, RpcEnvelope};
use crate::core::kernel::subscription::{forward, Subscription, DEFAULT_SUBSCRIPTION_BUFFER};
use crate::core::kernel::transport::{StreamOperation, Transport, UnaryOperation};
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, trace, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = Arc<Mutex<SplitSink<WsStream, Message>>>;
type RouteTable = Arc<Mutex<HashMap<u64, Route>>>;

/// Consecutive undecodable frames a subscription tolerates before failing
pub const DEFAULT_MAX_DECODE_FAILURES: u32 = 16;

/// WebSocket transport configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    /// Deadline for one unary call
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Per-subscription channel capacity
    pub subscription_buffer: usize,
    /// 0 disables the limit
    pub max_consecutive_decode_failures: u32,
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            subscription_buffer: DEFAULT_SUBSCRIPTION_BUFFER,
            max_consecutive_decode_failures: DEFAULT_MAX_DECODE_FAILURES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_subscription_buffer(mut self, buffer: usize) -> Self {
        self.subscription_buffer = buffer;
        self
    }

    pub fn with_max_consecutive_decode_failures(mut self, limit: u32) -> Self {
        self.max_consecutive_decode_failures = limit;
        self
    }
}

/// Why the reader stopped feeding a route
#[derive(Debug, Clone)]
enum RouteEnd {
    Disconnected,
    /// The subscription's buffer was full when a frame arrived
    Lagging,
    Undecodable(String),
}

impl RouteEnd {
    fn to_error(&self) -> SerumError {
        match self {
            Self::Disconnected => SerumError::Connection("WebSocket connection closed".to_string()),
            Self::Lagging => SerumError::StreamClosed("consumer lagging".to_string()),
            Self::Undecodable(reason) => SerumError::Decode(reason.clone()),
        }
    }
}

/// Where a frame with a given request id goes
enum Route {
    Unary(oneshot::Sender<Result<RpcEnvelope, SerumError>>),
    Stream {
        frames: mpsc::Sender<RpcEnvelope>,
        end: Arc<OnceLock<RouteEnd>>,
    },
}

impl Route {
    /// Fail the route with `reason`; stream relays drain what is buffered first
    fn fail(self, reason: &RouteEnd) {
        match self {
            Self::Unary(tx) => {
                let _ = tx.send(Err(reason.to_error()));
            }
            Self::Stream { end, .. } => {
                let _ = end.set(reason.clone());
            }
        }
    }
}

/// JSON-RPC over one persistent WebSocket connection
///
/// Every call gets a fresh request id. A single reader task routes incoming
/// frames to the pending call or live subscription with the same id, so
/// unary calls and any number of subscriptions share the connection. Writes
/// are serialized through one lock.
///
/// The reader never waits on a consumer: a subscription whose buffer is full
/// is ended with [`SerumError::StreamClosed`] and the other calls carry on.
/// A connection that keeps sending frames that are not JSON-RPC envelopes is
/// closed after `max_consecutive_decode_failures` of them in a row.
pub struct WsTransport {
    config: WsConfig,
    writer: WsWriter,
    routes: RouteTable,
    next_id: AtomicU64,
    connected: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl WsTransport {
    /// Open the connection and start the reader task
    #[instrument(skip(config), fields(transport = "ws", url = %config.url))]
    pub async fn connect(config: WsConfig) -> Result<Self, SerumError> {
        let (stream, _) = tokio::time::timeout(config.connect_timeout, connect_async(config.url.as_str()))
            .await
            .map_err(|_| SerumError::Timeout(config.connect_timeout))?
            .map_err(|e| SerumError::Connection(format!("WebSocket connection failed: {}", e)))?;

        let (write, read) = stream.split();
        let writer: WsWriter = Arc::new(Mutex::new(write));
        let routes: RouteTable = Arc::new(Mutex::new(HashMap::new()));
        let connected = Arc::new(AtomicBool::new(true));
        let shutdown = CancellationToken::new();

        tokio::spawn(read_loop(
            read,
            Arc::clone(&writer),
            Arc::clone(&routes),
            Arc::clone(&connected),
            shutdown.clone(),
            config.max_consecutive_decode_failures,
        ));

        debug!("WebSocket connected");

        Ok(Self {
            config,
            writer,
            routes,
            next_id: AtomicU64::new(1),
            connected,
            shutdown,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &WsConfig {
        &self.config
    }

    /// Close the connection, failing every pending call and subscription
    #[instrument(skip(self), fields(transport = "ws"))]
    pub async fn close(&self) -> Result<(), SerumError> {
        self.shutdown.cancel();
        self.connected.store(false, Ordering::SeqCst);
        let mut writer = self.writer.lock().await;
        let _ = writer.send(Message::Close(None)).await;
        Ok(())
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn send_frame(&self, frame: String) -> Result<(), SerumError> {
        if !self.is_connected() {
            return Err(SerumError::Connection(
                "WebSocket not connected".to_string(),
            ));
        }

        trace!("Sending frame: {}", frame);
        let mut writer = self.writer.lock().await;
        writer.send(Message::Text(frame)).await.map_err(|e| {
            self.connected.store(false, Ordering::SeqCst);
            SerumError::Connection(format!("Failed to send WebSocket message: {}", e))
        })
    }

    async fn deregister(&self, id: u64) {
        self.routes.lock().await.remove(&id);
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl Transport for WsTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::WebSocket
    }

    #[instrument(skip(self, request), fields(transport = "ws", method = O::METHOD))]
    async fn unary<O: UnaryOperation>(
        &self,
        request: O::Request,
    ) -> Result<O::Response, SerumError> {
        let id = self.next_request_id();
        let frame = codec::encode_rpc_request(id, O::METHOD, &request)?;

        let (tx, rx) = oneshot::channel();
        self.routes.lock().await.insert(id, Route::Unary(tx));

        let exchange = async {
            self.send_frame(frame).await?;
            rx.await.unwrap_or_else(|_| {
                Err(SerumError::Connection(
                    "WebSocket closed before a response arrived".to_string(),
                ))
            })
        };

        match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(Ok(envelope)) => codec::decode_result(envelope),
            Ok(Err(e)) => {
                self.deregister(id).await;
                Err(e)
            }
            Err(_) => {
                self.deregister(id).await;
                Err(SerumError::Timeout(self.config.timeout))
            }
        }
    }

    #[instrument(skip(self, request, cancel), fields(transport = "ws", method = O::METHOD))]
    async fn stream<O: StreamOperation>(
        &self,
        request: O::Request,
        cancel: CancellationToken,
    ) -> Result<Subscription<O::Response>, SerumError> {
        let id = self.next_request_id();
        let frame = codec::encode_rpc_request(id, O::METHOD, &request)?;

        let (frames_tx, frames_rx) = mpsc::channel(self.config.subscription_buffer.max(1));
        let end = Arc::new(OnceLock::new());
        self.routes.lock().await.insert(
            id,
            Route::Stream {
                frames: frames_tx,
                end: Arc::clone(&end),
            },
        );

        if let Err(e) = self.send_frame(frame).await {
            self.deregister(id).await;
            return Err(e);
        }

        let routes = Arc::clone(&self.routes);
        let max_failures = self.config.max_consecutive_decode_failures;

        Ok(Subscription::spawn(
            cancel.child_token(),
            self.config.subscription_buffer,
            move |output, cancel| async move {
                let result = relay_frames(frames_rx, &end, output, cancel, max_failures).await;
                routes.lock().await.remove(&id);
                result
            },
        ))
    }
}

/// Drain the socket and dispatch frames until shutdown or disconnect
async fn read_loop(
    mut read: SplitStream<WsStream>,
    writer: WsWriter,
    routes: RouteTable,
    connected: Arc<AtomicBool>,
    shutdown: CancellationToken,
    max_consecutive_failures: u32,
) {
    let mut consecutive_failures = 0u32;

    let reason = loop {
        let next = tokio::select! {
            () = shutdown.cancelled() => break RouteEnd::Disconnected,
            next = read.next() => next,
        };

        let frame = match next {
            Some(Ok(Message::Text(text))) => Ok(text),
            Some(Ok(Message::Binary(data))) => String::from_utf8(data)
                .map_err(|e| format!("non-UTF-8 binary frame: {}", e)),
            Some(Ok(Message::Ping(payload))) => {
                let mut writer = writer.lock().await;
                if let Err(e) = writer.send(Message::Pong(payload)).await {
                    warn!("Failed to send pong response: {}", e);
                }
                continue;
            }
            Some(Ok(Message::Close(frame))) => {
                debug!(?frame, "WebSocket closed by server");
                break RouteEnd::Disconnected;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                error!("WebSocket error: {}", e);
                break RouteEnd::Disconnected;
            }
            None => {
                debug!("WebSocket stream ended");
                break RouteEnd::Disconnected;
            }
        };

        let dispatched = match frame {
            Ok(text) => dispatch_frame(&routes, &text).await,
            Err(reason) => Err(reason),
        };

        match dispatched {
            Ok(()) => consecutive_failures = 0,
            Err(reason) => {
                consecutive_failures += 1;
                warn!(consecutive_failures, "Dropping undecodable frame: {}", reason);

                if max_consecutive_failures > 0 && consecutive_failures >= max_consecutive_failures
                {
                    let reason = format!(
                        "{} consecutive undecodable frames, last: {}",
                        consecutive_failures, reason
                    );
                    error!("Closing WebSocket: {}", reason);
                    let _ = writer.lock().await.send(Message::Close(None)).await;
                    break RouteEnd::Undecodable(reason);
                }
            }
        }
    };

    connected.store(false, Ordering::SeqCst);
    // dropping the senders ends every relay once its buffer is drained
    for (_, route) in routes.lock().await.drain() {
        route.fail(&reason);
    }
}

/// Route one frame without waiting on its consumer
///
/// Fails only when the frame is not a JSON-RPC envelope.
async fn dispatch_frame(routes: &RouteTable, frame: &str) -> Result<(), String> {
    trace!("Received frame: {}", frame);

    let envelope = codec::decode_envelope(frame).map_err(|e| e.to_string())?;

    let Some(id) = envelope.id else {
        debug!("Ignoring frame without request id");
        return Ok(());
    };

    let mut table = routes.lock().await;
    let Some(route) = table.remove(&id) else {
        debug!(id, "No pending call for frame");
        return Ok(());
    };

    match route {
        Route::Unary(tx) => {
            let _ = tx.send(Ok(envelope));
        }
        Route::Stream { frames, end } => match frames.try_send(envelope) {
            Ok(()) => {
                table.insert(id, Route::Stream { frames, end });
            }
            Err(TrySendError::Full(_)) => {
                warn!(id, "Subscription is not keeping up, ending it");
                let _ = end.set(RouteEnd::Lagging);
            }
            Err(TrySendError::Closed(_)) => {}
        },
    }

    Ok(())
}

/// Decode subscription frames and forward them in arrival order
///
/// Undecodable frames are logged and skipped. Remote errors are forwarded
/// and the subscription continues. Once the reader lets go of the route the
/// buffered frames are still delivered, then the reason recorded in `end`.
async fn relay_frames<T: DeserializeOwned + Send>(
    mut frames: mpsc::Receiver<RpcEnvelope>,
    end: &OnceLock<RouteEnd>,
    output: mpsc::Sender<Result<T, SerumError>>,
    cancel: CancellationToken,
    max_consecutive_failures: u32,
) -> Result<(), SerumError> {
    let mut consecutive_failures = 0u32;

    loop {
        let envelope = tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            envelope = frames.recv() => envelope,
        };

        let Some(envelope) = envelope else {
            let reason = end.get().cloned().unwrap_or(RouteEnd::Disconnected);
            forward(&output, &cancel, Err(reason.to_error())).await;
            return Err(reason.to_error());
        };

        match codec::decode_result::<T>(envelope) {
            Ok(item) => {
                consecutive_failures = 0;
                if !forward(&output, &cancel, Ok(item)).await {
                    return Ok(());
                }
            }
            Err(SerumError::Decode(reason)) => {
                consecutive_failures += 1;
                warn!(consecutive_failures, "Skipping undecodable frame: {}", reason);

                if max_consecutive_failures > 0 && consecutive_failures >= max_consecutive_failures
                {
                    let reason = format!(
                        "{} consecutive undecodable frames, last: {}",
                        consecutive_failures, reason
                    );
                    error!("{}", reason);
                    forward(&output, &cancel, Err(SerumError::Decode(reason.clone()))).await;
                    return Err(SerumError::Decode(reason));
                }
            }
            Err(remote) => {
                consecutive_failures = 0;
                if !forward(&output, &cancel, Err(remote)).await {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GetTradesStreamResponse;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> RpcEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_relay_skips_bad_frames_and_keeps_order() {
        let (frames_tx, frames_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);

        frames_tx.send(envelope(json!({"id": 1, "result": {"slot": "1"}}))).await.unwrap();
        frames_tx.send(envelope(json!({"id": 1, "result": {"slot": "not a slot"}}))).await.unwrap();
        frames_tx.send(envelope(json!({"id": 1, "result": {"slot": "2"}}))).await.unwrap();
        drop(frames_tx);

        let result = relay_frames::<GetTradesStreamResponse>(
            frames_rx,
            &OnceLock::new(),
            out_tx,
            CancellationToken::new(),
            16,
        )
        .await;

        assert!(matches!(result, Err(SerumError::Connection(_))));
        assert_eq!(out_rx.recv().await.unwrap().unwrap().slot, 1);
        assert_eq!(out_rx.recv().await.unwrap().unwrap().slot, 2);
        assert!(matches!(out_rx.recv().await.unwrap(), Err(SerumError::Connection(_))));
        assert!(out_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_relay_forwards_remote_errors_and_continues() {
        let (frames_tx, frames_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let cancel_relay = cancel.clone();

        frames_tx
            .send(envelope(json!({"id": 1, "error": {"code": 13, "message": "lagging"}})))
            .await
            .unwrap();
        frames_tx.send(envelope(json!({"id": 1, "result": {"slot": 5}}))).await.unwrap();

        let relay = tokio::spawn(async move {
            let end = OnceLock::new();
            relay_frames::<GetTradesStreamResponse>(frames_rx, &end, out_tx, cancel_relay, 16).await
        });

        assert!(out_rx.recv().await.unwrap().unwrap_err().is_remote());
        assert_eq!(out_rx.recv().await.unwrap().unwrap().slot, 5);

        cancel.cancel();
        assert!(relay.await.unwrap().is_ok());
        drop(frames_tx);
    }

    #[tokio::test]
    async fn test_relay_fails_after_decode_limit() {
        let (frames_tx, frames_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);

        for _ in 0..3 {
            frames_tx.send(envelope(json!({"id": 1, "result": "oops"}))).await.unwrap();
        }

        let result = relay_frames::<GetTradesStreamResponse>(
            frames_rx,
            &OnceLock::new(),
            out_tx,
            CancellationToken::new(),
            3,
        )
        .await;

        assert!(matches!(result, Err(SerumError::Decode(_))));
        assert!(matches!(out_rx.recv().await.unwrap(), Err(SerumError::Decode(_))));
        drop(frames_tx);
    }

    #[tokio::test]
    async fn test_relay_reports_why_the_route_ended_after_draining() {
        let (frames_tx, frames_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let end = OnceLock::new();

        frames_tx.send(envelope(json!({"id": 1, "result": {"slot": "7"}}))).await.unwrap();
        end.set(RouteEnd::Lagging).unwrap();
        drop(frames_tx);

        let result = relay_frames::<GetTradesStreamResponse>(
            frames_rx,
            &end,
            out_tx,
            CancellationToken::new(),
            16,
        )
        .await;

        assert!(matches!(result, Err(SerumError::StreamClosed(_))));
        assert_eq!(out_rx.recv().await.unwrap().unwrap().slot, 7);
        assert!(matches!(out_rx.recv().await.unwrap(), Err(SerumError::StreamClosed(_))));
        assert!(out_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_full_subscription_buffer_drops_only_that_route() {
        let routes: RouteTable = Arc::new(Mutex::new(HashMap::new()));
        let (frames_tx, mut frames_rx) = mpsc::channel(1);
        let end = Arc::new(OnceLock::new());
        let (unary_tx, unary_rx) = oneshot::channel();
        {
            let mut table = routes.lock().await;
            table.insert(
                1,
                Route::Stream {
                    frames: frames_tx,
                    end: Arc::clone(&end),
                },
            );
            table.insert(2, Route::Unary(unary_tx));
        }

        let frame = |id: u64, slot: u64| json!({"id": id, "result": {"slot": slot}}).to_string();

        dispatch_frame(&routes, &frame(1, 1)).await.unwrap();
        assert!(end.get().is_none());

        dispatch_frame(&routes, &frame(1, 2)).await.unwrap();
        assert!(matches!(end.get(), Some(RouteEnd::Lagging)));
        assert!(!routes.lock().await.contains_key(&1));

        dispatch_frame(&routes, &frame(2, 3)).await.unwrap();
        assert_eq!(unary_rx.await.unwrap().unwrap().id, Some(2));

        assert!(frames_rx.recv().await.is_some());
        assert!(frames_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_rejects_frames_that_are_not_envelopes() {
        let routes: RouteTable = Arc::new(Mutex::new(HashMap::new()));

        assert!(dispatch_frame(&routes, "garbage").await.is_err());
        assert!(dispatch_frame(&routes, r#"{"id": 9, "result": 1}"#).await.is_ok());
    }
}
