//! Core domain types and pure logic for the ettametta client.
//!
//! Job records and their merge semantics, the keyed job collection,
//! pipeline stage derivation, telemetry payloads, and the shared
//! session object. No I/O lives here -- everything in this crate is
//! synchronous and deterministic.

pub mod job;
pub mod ledger;
pub mod pipeline;
pub mod session;
pub mod telemetry;
pub mod types;
