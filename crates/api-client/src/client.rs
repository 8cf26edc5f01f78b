//! HTTP client for the ettametta REST API.

use etta_core::job::JobRecord;
use etta_core::session::Session;
use etta_core::types::JobId;

use crate::models::{
    AbortResponse, FilterConfig, SettingUpdate, Token, TransformRequest, TransformResponse,
    UserProfile,
};

/// Client for one API base URL, sharing a session with other
/// collaborators (the streaming subscriptions read the same session).
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://host:8000`).
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    /// Create a client reusing an existing [`reqwest::Client`] (useful
    /// for connection pooling across collaborators).
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Session,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchange credentials for a bearer token and store it in the
    /// session. Every subsequent request from any collaborator sharing
    /// the session picks the token up automatically.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let token: Token = Self::parse_response(response).await?;
        self.session.set_token(&token.access_token);
        tracing::info!(username, "Logged in");
        Ok(token)
    }

    /// Drop the stored token.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// Fetch the authenticated user's profile (`GET /auth/me`).
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let response = self
            .authorize(self.http.get(format!("{}/auth/me", self.base_url)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// List the user's transformation jobs (`GET /video/jobs`), newest
    /// first. Used to seed a job ledger before streaming deltas.
    pub async fn list_jobs(&self) -> Result<Vec<JobRecord>, ApiError> {
        let response = self
            .authorize(self.http.get(format!("{}/video/jobs", self.base_url)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Submit a transformation (`POST /video/transform`).
    pub async fn submit_transform(
        &self,
        request: &TransformRequest,
    ) -> Result<TransformResponse, ApiError> {
        let response = self
            .authorize(self.http.post(format!("{}/video/transform", self.base_url)))
            .json(request)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Abort a queued or running job (`POST /video/jobs/{id}/abort`).
    pub async fn abort_job(&self, id: &JobId) -> Result<AbortResponse, ApiError> {
        let response = self
            .authorize(
                self.http
                    .post(format!("{}/video/jobs/{id}/abort", self.base_url)),
            )
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// List the available transformation filters (`GET /settings/filters`).
    pub async fn available_filters(&self) -> Result<Vec<FilterConfig>, ApiError> {
        let response = self
            .authorize(self.http.get(format!("{}/settings/filters", self.base_url)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Toggle one filter (`POST /settings/filters/{id}/toggle`).
    /// Returns the filter's new state.
    pub async fn toggle_filter(&self, id: &str) -> Result<FilterConfig, ApiError> {
        let response = self
            .authorize(
                self.http
                    .post(format!("{}/settings/filters/{id}/toggle", self.base_url)),
            )
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Fetch the admin settings bundle (`GET /settings/`). The bundle
    /// shape is backend-defined, so it is returned untyped.
    pub async fn settings(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .authorize(self.http.get(format!("{}/settings/", self.base_url)))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Update one admin setting (`POST /settings/`).
    pub async fn update_setting(
        &self,
        update: &SettingUpdate,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .authorize(self.http.post(format!("{}/settings/", self.base_url)))
            .json(update)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Attach the bearer token from the current session snapshot, if
    /// one is present.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ensure a success status and decode the JSON body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
