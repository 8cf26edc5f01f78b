//! Resilient streaming client for the ettametta real-time endpoints.
//!
//! Provides typed message parsing, a WebSocket connection wrapper with
//! a bounded establish timeout, exponential-backoff reconnection, and
//! the [`Subscription`](subscription::Subscription) handle that exposes
//! the latest decoded message plus a connection-status signal to
//! consumers.

pub mod backoff;
pub mod client;
pub mod messages;
pub mod subscription;
