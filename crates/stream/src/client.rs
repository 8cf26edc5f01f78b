//! WebSocket connection wrapper with a bounded establish timeout.
//!
//! [`StreamClient`] holds the subscription URL and the establish
//! timeout. [`StreamClient::connect`] either yields an open socket or
//! fails -- a handshake still pending when the timeout fires is
//! abandoned and reported as a failed attempt, identical to a refused
//! connection.

use std::time::Duration;

use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// An open WebSocket stream to a streaming endpoint.
pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Connection factory for a single subscription URL.
pub struct StreamClient {
    url: String,
    connect_timeout: Duration,
}

/// Errors from a single connection attempt.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The WebSocket handshake failed (refused, DNS, TLS, protocol).
    #[error("Connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    /// The connection did not reach the open state in time.
    #[error("Connection to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
}

impl StreamClient {
    pub fn new(url: String, connect_timeout: Duration) -> Self {
        Self {
            url,
            connect_timeout,
        }
    }

    /// Subscription URL this client connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Attempt to open the connection, bounded by the establish timeout.
    pub async fn connect(&self) -> Result<WsStream, StreamError> {
        match tokio::time::timeout(self.connect_timeout, connect_async(&self.url)).await {
            Ok(Ok((ws_stream, _response))) => {
                tracing::info!(url = %self.url, "Stream connected");
                Ok(ws_stream)
            }
            Ok(Err(e)) => Err(StreamError::Connect {
                url: self.url.clone(),
                reason: e.to_string(),
            }),
            Err(_elapsed) => Err(StreamError::Timeout {
                url: self.url.clone(),
                timeout: self.connect_timeout,
            }),
        }
    }
}
