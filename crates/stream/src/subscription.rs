//! Auto-reconnecting subscription to one streaming endpoint.
//!
//! [`Subscription::open`] spawns a background task that owns the
//! socket: settle delay, connect under the establish timeout, read
//! frames, and on any drop retry with exponential backoff until the
//! attempt ceiling. The consumer observes exactly two signals, both
//! through `tokio::sync::watch` channels: the connection status and
//! the latest decoded message. Watch semantics are last-value-wins --
//! a consumer that misses an intermediate message is not guaranteed to
//! see it, matching the delivery contract.
//!
//! A subscription is bound to one URL for its lifetime. To follow a
//! different address, close this subscription and open a new one.

use futures::StreamExt;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::backoff::ReconnectPolicy;
use crate::client::{StreamClient, WsStream};
use crate::messages::{parse_message, StreamMessage};

/// Lifecycle state of the subscription's connection.
///
/// `Closed` covers both "between reconnect attempts" and "retry
/// ceiling reached"; a consumer treats prolonged `Closed` as stream
/// unavailable. The subscription never surfaces errors any other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    Closed,
}

/// Handle to a live streaming subscription.
///
/// Dropping the handle tears the connection task down: pending timers
/// are cancelled, the socket is closed, and no further status or
/// message updates are delivered.
pub struct Subscription {
    status_rx: watch::Receiver<ConnectionStatus>,
    latest_rx: watch::Receiver<Option<StreamMessage>>,
    cancel: CancellationToken,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl Subscription {
    /// Open a subscription to `url` with the given reconnect policy.
    ///
    /// Returns immediately; the first connection attempt happens after
    /// the policy's settle delay, on the spawned task.
    pub fn open(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        let url = url.into();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);
        let (latest_tx, latest_rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_subscription(
            url,
            policy,
            status_tx,
            latest_tx,
            cancel.clone(),
        ));

        Self {
            status_rx,
            latest_rx,
            cancel,
            task: Some(task),
        }
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Watch receiver for status transitions.
    pub fn status_rx(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Snapshot of the most recently received message, if any.
    pub fn latest(&self) -> Option<StreamMessage> {
        self.latest_rx.borrow().clone()
    }

    /// Watch receiver for latest-message updates.
    pub fn latest_rx(&self) -> watch::Receiver<Option<StreamMessage>> {
        self.latest_rx.clone()
    }

    /// Tear the subscription down and wait for the task to exit.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Connection task: settle -> connect -> read -> backoff -> reconnect.
///
/// Exits when cancelled or when the attempt ceiling is reached. The
/// watch senders are dropped on exit, which is how a consumer holding
/// a receiver can observe that the task is gone.
async fn run_subscription(
    url: String,
    policy: ReconnectPolicy,
    status_tx: watch::Sender<ConnectionStatus>,
    latest_tx: watch::Sender<Option<StreamMessage>>,
    cancel: CancellationToken,
) {
    // Settle delay before the very first attempt.
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(policy.settle_delay) => {}
    }

    let client = StreamClient::new(url, policy.connect_timeout);
    let mut attempts = 0u32;

    loop {
        let connected = tokio::select! {
            _ = cancel.cancelled() => return,
            result = client.connect() => result,
        };

        match connected {
            Ok(ws_stream) => {
                let _ = status_tx.send(ConnectionStatus::Open);
                attempts = 0;

                read_frames(ws_stream, &latest_tx, &cancel).await;

                let _ = status_tx.send(ConnectionStatus::Closed);
                if cancel.is_cancelled() {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(url = %client.url(), error = %e, "Connection attempt failed");
                let _ = status_tx.send(ConnectionStatus::Closed);
            }
        }

        if attempts >= policy.max_attempts {
            tracing::warn!(
                url = %client.url(),
                max_attempts = policy.max_attempts,
                "Reconnect ceiling reached, giving up",
            );
            return;
        }

        let delay = policy.delay_for(attempts);
        attempts += 1;
        tracing::info!(
            url = %client.url(),
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting",
        );

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// Read frames until the socket drops or the subscription is cancelled.
///
/// Text frames are parsed into [`StreamMessage`]s; a malformed frame is
/// logged and dropped without touching the latest-message value.
async fn read_frames(
    mut ws_stream: WsStream,
    latest_tx: &watch::Sender<Option<StreamMessage>>,
    cancel: &CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = ws_stream.close(None).await;
                return;
            }
            frame = ws_stream.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => match parse_message(&text) {
                Ok(message) => {
                    let _ = latest_tx.send(Some(message));
                }
                Err(e) => {
                    tracing::warn!(error = %e, raw = %text, "Dropping malformed stream frame");
                }
            },
            Some(Ok(Message::Binary(_))) => {
                tracing::trace!("Ignoring binary frame");
            }
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                // Handled automatically by tungstenite.
            }
            Some(Ok(Message::Close(frame))) => {
                tracing::info!(?frame, "Server closed the stream");
                return;
            }
            Some(Ok(Message::Frame(_))) => {}
            Some(Err(e)) => {
                tracing::error!(error = %e, "Stream receive error");
                return;
            }
            None => {
                tracing::info!("Stream exhausted");
                return;
            }
        }
    }
}
