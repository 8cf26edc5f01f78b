//! Job records and the partial-update merge semantics.
//!
//! The backend tracks a video transformation as a job with a `status`
//! and a `progress` percentage. Stream updates arrive as *partial*
//! records (a delta may carry only `{id, progress}`), so the client
//! keeps one [`JobRecord`] per id and folds each [`JobDelta`] into it
//! field by field.

use serde::{Deserialize, Serialize};

use crate::types::{JobId, Timestamp};

/// Lifecycle state of a server-tracked job.
///
/// The backend is inconsistent about casing (`"Queued"`, `"COMPLETED"`
/// and `"processing"` all occur on the wire), so deserialization is
/// case-insensitive. Serialization uses the canonical capitalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Downloading,
    Processing,
    Rendering,
    Completed,
    Failed,
    Aborted,
}

/// Error returned when a status string matches no known lifecycle state.
#[derive(Debug, thiserror::Error)]
#[error("Unknown job status: {0:?}")]
pub struct UnknownJobStatus(pub String);

impl JobStatus {
    /// Canonical wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Downloading => "Downloading",
            JobStatus::Processing => "Processing",
            JobStatus::Rendering => "Rendering",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
            JobStatus::Aborted => "Aborted",
        }
    }

    /// A terminal job never changes status again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Aborted
        )
    }
}

impl std::str::FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "queued" => Ok(JobStatus::Queued),
            "downloading" => Ok(JobStatus::Downloading),
            "processing" => Ok(JobStatus::Processing),
            "rendering" => Ok(JobStatus::Rendering),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "aborted" => Ok(JobStatus::Aborted),
            _ => Err(UnknownJobStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JobStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A fully materialized job as held by the client.
///
/// Fields the client does not model (the backend freely adds keys to
/// job payloads) are preserved verbatim in `extra` so that merges do
/// not silently drop them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A partial job update as carried by `job_update` / `nexus_job_update`
/// stream messages. Only `id` is guaranteed to be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDelta {
    pub id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobRecord {
    /// Materialize a record from the first delta seen for an id.
    ///
    /// Missing fields fall back to the state a freshly submitted job
    /// starts in (`Queued`, 0%).
    pub fn from_delta(delta: &JobDelta) -> Self {
        Self {
            id: delta.id.clone(),
            status: delta.status.unwrap_or(JobStatus::Queued),
            progress: delta.progress.unwrap_or(0),
            title: delta.title.clone(),
            input_url: delta.input_url.clone(),
            created_at: delta.created_at,
            extra: delta.extra.clone(),
        }
    }

    /// Shallow-merge a delta into this record.
    ///
    /// Incoming fields win per-field; fields absent from the delta are
    /// preserved. Applying the same delta twice is a no-op the second
    /// time.
    pub fn apply(&mut self, delta: &JobDelta) {
        debug_assert_eq!(self.id, delta.id, "delta applied to the wrong record");

        if let Some(status) = delta.status {
            self.status = status;
        }
        if let Some(progress) = delta.progress {
            self.progress = progress;
        }
        if let Some(ref title) = delta.title {
            self.title = Some(title.clone());
        }
        if let Some(ref input_url) = delta.input_url {
            self.input_url = Some(input_url.clone());
        }
        if let Some(created_at) = delta.created_at {
            self.created_at = Some(created_at);
        }
        for (key, value) in &delta.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(json: &str) -> JobDelta {
        serde_json::from_str(json).expect("test delta should parse")
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Queued".parse::<JobStatus>().unwrap(), JobStatus::Queued);
        assert_eq!("COMPLETED".parse::<JobStatus>().unwrap(), JobStatus::Completed);
        assert_eq!("processing".parse::<JobStatus>().unwrap(), JobStatus::Processing);
    }

    #[test]
    fn unknown_status_is_an_error() {
        assert!("exploded".parse::<JobStatus>().is_err());
    }

    #[test]
    fn status_serializes_canonically() {
        let json = serde_json::to_string(&JobStatus::Failed).unwrap();
        assert_eq!(json, r#""Failed""#);
    }

    #[test]
    fn delta_with_partial_fields_deserializes() {
        let d = delta(r#"{"id":"abc","progress":70}"#);
        assert_eq!(d.id, "abc");
        assert_eq!(d.progress, Some(70));
        assert!(d.status.is_none());
    }

    #[test]
    fn apply_overwrites_present_fields_and_preserves_absent_ones() {
        let mut record =
            JobRecord::from_delta(&delta(r#"{"id":"abc","status":"processing","progress":40}"#));
        record.apply(&delta(r#"{"id":"abc","progress":70}"#));

        assert_eq!(record.status, JobStatus::Processing);
        assert_eq!(record.progress, 70);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut once =
            JobRecord::from_delta(&delta(r#"{"id":"abc","status":"queued","progress":5}"#));
        let update = delta(r#"{"id":"abc","status":"downloading","progress":12,"title":"t"}"#);

        once.apply(&update);
        let mut twice = once.clone();
        twice.apply(&update);

        assert_eq!(serde_json::to_value(&once).unwrap(), serde_json::to_value(&twice).unwrap());
    }

    #[test]
    fn apply_merges_unmodeled_fields() {
        let mut record = JobRecord::from_delta(&delta(r#"{"id":"abc","worker":"gpu-1"}"#));
        record.apply(&delta(r#"{"id":"abc","eta_secs":90}"#));

        assert_eq!(record.extra["worker"], "gpu-1");
        assert_eq!(record.extra["eta_secs"], 90);
    }

    #[test]
    fn from_delta_defaults_to_freshly_queued() {
        let record = JobRecord::from_delta(&delta(r#"{"id":"abc"}"#));
        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.progress, 0);
    }
}
