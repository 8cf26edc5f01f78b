//! Request and response models for the ettametta REST API.

use serde::{Deserialize, Serialize};

use etta_core::job::JobStatus;

/// Body for `POST /video/transform`.
#[derive(Debug, Clone, Serialize)]
pub struct TransformRequest {
    pub input_url: String,
    pub niche: String,
    pub platform: String,
}

/// Response from `POST /video/transform`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformResponse {
    /// Task-queue id; doubles as the job id in stream updates.
    pub task_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `POST /video/jobs/{id}/abort`.
#[derive(Debug, Clone, Deserialize)]
pub struct AbortResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// One transformation filter as returned by `GET /settings/filters`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST /settings/` (admin key/value update).
#[derive(Debug, Clone, Serialize)]
pub struct SettingUpdate {
    pub key: String,
    pub value: serde_json::Value,
}

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Response from `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub role: String,
    pub subscription: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
