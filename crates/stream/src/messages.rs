//! Stream message envelope and parser.
//!
//! The streaming endpoints send JSON text frames discriminated by a
//! `"type"` field. Job updates carry their payload under `"data"`;
//! telemetry pulses put their fields at the envelope top level, so the
//! dispatch is done by hand rather than with a derived tagged enum.
//!
//! Unrecognized `type` values deserialize into [`StreamMessage::Unknown`]
//! instead of failing: specific consumers ignore them, but they still
//! count as the latest message.

use etta_core::job::JobDelta;
use etta_core::telemetry::TelemetryPulse;

/// All stream message kinds consumed by the client.
#[derive(Debug, Clone)]
pub enum StreamMessage {
    /// Partial update for a transformation job.
    JobUpdate(JobDelta),

    /// Partial update for a Nexus pipeline job.
    NexusJobUpdate(JobDelta),

    /// Periodic metrics snapshot from the telemetry endpoint.
    TelemetryPulse(TelemetryPulse),

    /// Server keep-alive.
    Ping {
        /// Server event-loop time in seconds.
        timestamp: Option<f64>,
    },

    /// Forward-compatibility catch-all for message kinds this client
    /// does not model. `kind` is the raw `type` value (empty when the
    /// field was missing), `payload` the whole envelope.
    Unknown {
        kind: String,
        payload: serde_json::Value,
    },
}

/// Parse one text frame into a typed [`StreamMessage`].
///
/// Returns `Err` for frames that are not valid JSON, and for frames
/// whose recognized `type` carries a payload that does not deserialize.
/// Callers log and drop such frames without touching held state.
pub fn parse_message(text: &str) -> Result<StreamMessage, serde_json::Error> {
    let envelope: serde_json::Value = serde_json::from_str(text)?;
    let kind = envelope
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned();

    match kind.as_str() {
        "job_update" => serde_json::from_value(data_field(&envelope)).map(StreamMessage::JobUpdate),
        "nexus_job_update" => {
            serde_json::from_value(data_field(&envelope)).map(StreamMessage::NexusJobUpdate)
        }
        "telemetry_pulse" => serde_json::from_value(envelope).map(StreamMessage::TelemetryPulse),
        "ping" => Ok(StreamMessage::Ping {
            timestamp: envelope.get("timestamp").and_then(serde_json::Value::as_f64),
        }),
        _ => Ok(StreamMessage::Unknown {
            kind,
            payload: envelope,
        }),
    }
}

fn data_field(envelope: &serde_json::Value) -> serde_json::Value {
    envelope
        .get("data")
        .cloned()
        .unwrap_or(serde_json::Value::Null)
}
