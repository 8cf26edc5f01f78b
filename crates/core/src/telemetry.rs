//! Telemetry pulse payloads.
//!
//! The `/ws/telemetry` endpoint pushes a metrics snapshot roughly once
//! per second. Pulses are independent of job state; each one fully
//! replaces the previous.

use serde::{Deserialize, Serialize};

/// One server-pushed telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPulse {
    /// Server event-loop time in seconds.
    #[serde(default)]
    pub timestamp: Option<f64>,
    pub metrics: TelemetryMetrics,
    #[serde(default)]
    pub active_segments: Vec<SegmentLoad>,
    #[serde(default)]
    pub geo_activity: Vec<GeoPoint>,
}

/// Aggregate throughput/health numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryMetrics {
    pub bitrate: f64,
    pub latency: f64,
    pub signal_strength: f64,
    pub active_nodes: u32,
    pub global_velocity: f64,
}

/// Load percentage for one named region segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLoad {
    pub label: String,
    pub load: u8,
}

/// A single activity point on the globe view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub intensity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shape captured from the telemetry producer.
    const PULSE: &str = r#"{
        "type": "telemetry_pulse",
        "timestamp": 162534.25,
        "metrics": {
            "bitrate": 812.44,
            "latency": 23.1,
            "signal_strength": 0.97,
            "active_nodes": 4120,
            "global_velocity": 3.6
        },
        "active_segments": [
            {"label": "US-EAST", "load": 72},
            {"label": "EU-WEST", "load": 44}
        ],
        "geo_activity": [
            {"lat": 40.7128, "lng": -74.006, "intensity": 0.8}
        ]
    }"#;

    #[test]
    fn producer_payload_decodes() {
        let pulse: TelemetryPulse = serde_json::from_str(PULSE).unwrap();
        assert_eq!(pulse.metrics.active_nodes, 4120);
        assert_eq!(pulse.active_segments.len(), 2);
        assert_eq!(pulse.active_segments[0].label, "US-EAST");
        assert_eq!(pulse.geo_activity[0].intensity, 0.8);
    }

    #[test]
    fn segment_and_geo_lists_default_to_empty() {
        let pulse: TelemetryPulse = serde_json::from_str(
            r#"{"metrics":{"bitrate":1.0,"latency":1.0,"signal_strength":0.5,
                "active_nodes":1,"global_velocity":0.1}}"#,
        )
        .unwrap();
        assert!(pulse.active_segments.is_empty());
        assert!(pulse.geo_activity.is_empty());
        assert!(pulse.timestamp.is_none());
    }
}
