use crate::core::errors::SerumError;
use futures_util::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound for a relay task to wind down after cancellation
pub const RELAY_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Default capacity of a subscription's output channel
pub const DEFAULT_SUBSCRIPTION_BUFFER: usize = 256;

/// A live server-push subscription
///
/// Items arrive in transport order. A background relay task owns the
/// sending half of the channel, so the channel closes on every exit path of
/// the relay: cancellation, end of stream or connection failure. Dropping
/// the subscription cancels the relay.
pub struct Subscription<T> {
    receiver: mpsc::Receiver<Result<T, SerumError>>,
    cancel: CancellationToken,
    relay: Option<JoinHandle<Result<(), SerumError>>>,
}

impl<T: Send + 'static> Subscription<T> {
    /// Spawn `relay` as the producer of a new subscription
    pub fn spawn<F, Fut>(cancel: CancellationToken, buffer: usize, relay: F) -> Self
    where
        F: FnOnce(mpsc::Sender<Result<T, SerumError>>, CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), SerumError>> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = tokio::spawn(relay(sender, cancel.clone()));

        Self {
            receiver,
            cancel,
            relay: Some(handle),
        }
    }
}

impl<T> Subscription<T> {
    /// Next decoded item, or `None` once the relay has stopped
    pub async fn recv(&mut self) -> Option<Result<T, SerumError>> {
        self.receiver.recv().await
    }

    /// Signal the relay to stop without waiting for it
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.relay.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel the relay and wait for it to exit
    ///
    /// Returns how the relay terminated: `Ok(())` for a clean cancellation,
    /// or the error that ended the stream before it was closed. A relay
    /// that outlives [`RELAY_SHUTDOWN_GRACE`] is aborted.
    pub async fn close(mut self) -> Result<(), SerumError> {
        self.cancel.cancel();
        self.receiver.close();

        let Some(mut handle) = self.relay.take() else {
            return Ok(());
        };

        match tokio::time::timeout(RELAY_SHUTDOWN_GRACE, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(SerumError::StreamClosed(format!(
                "relay task failed: {}",
                join_error
            ))),
            Err(_) => {
                warn!("Subscription relay did not stop in time, aborting");
                handle.abort();
                Ok(())
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if self.relay.is_some() {
            debug!("Subscription dropped, cancelling relay");
        }
        self.cancel.cancel();
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Result<T, SerumError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

/// Push one item to the consumer unless the subscription is cancelled
///
/// Returns `false` when the relay should stop: the token fired or the
/// consumer went away.
pub(crate) async fn forward<T>(
    output: &mpsc::Sender<Result<T, SerumError>>,
    cancel: &CancellationToken,
    item: Result<T, SerumError>,
) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        sent = output.send(item) => sent.is_ok(),
    }
}
