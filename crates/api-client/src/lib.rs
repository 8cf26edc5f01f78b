//! REST client for the ettametta HTTP API.
//!
//! Wraps the bearer-token-authenticated endpoints the dashboard
//! consumes (jobs, transforms, filters, settings, profile) using
//! [`reqwest`]. The token comes from an injected
//! [`Session`](etta_core::session::Session) snapshot per request.

pub mod client;
pub mod models;
