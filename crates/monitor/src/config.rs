//! Environment-driven monitor configuration.

/// Resolved configuration for one monitor run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// WebSocket base, e.g. `ws://host:8000/ws`. Endpoints hang off it.
    pub ws_base_url: String,
    /// REST base for seeding the job ledger; streaming-only when unset.
    pub api_base_url: Option<String>,
    /// Bearer token for the REST base.
    pub api_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
}

impl MonitorConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("ETTAMETTA_WS_URL").ok(),
            std::env::var("ETTAMETTA_API_URL").ok(),
            std::env::var("ETTAMETTA_API_TOKEN").ok(),
        )
    }

    /// Build a config from already-read variables (testable seam).
    pub fn from_vars(
        ws_base_url: Option<String>,
        api_base_url: Option<String>,
        api_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let ws_base_url = ws_base_url.ok_or(ConfigError::MissingVar("ETTAMETTA_WS_URL"))?;

        Ok(Self {
            ws_base_url: ws_base_url.trim_end_matches('/').to_string(),
            api_base_url: api_base_url.map(|url| url.trim_end_matches('/').to_string()),
            api_token,
        })
    }

    /// Jobs stream endpoint.
    pub fn jobs_url(&self) -> String {
        format!("{}/jobs", self.ws_base_url)
    }

    /// Telemetry stream endpoint.
    pub fn telemetry_url(&self) -> String {
        format!("{}/telemetry", self.ws_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_is_required() {
        let result = MonitorConfig::from_vars(None, None, None);
        assert!(matches!(result, Err(ConfigError::MissingVar("ETTAMETTA_WS_URL"))));
    }

    #[test]
    fn endpoints_hang_off_the_ws_base() {
        let config =
            MonitorConfig::from_vars(Some("ws://host:8000/ws/".to_string()), None, None).unwrap();
        assert_eq!(config.jobs_url(), "ws://host:8000/ws/jobs");
        assert_eq!(config.telemetry_url(), "ws://host:8000/ws/telemetry");
    }

    #[test]
    fn api_base_is_optional_and_trimmed() {
        let config = MonitorConfig::from_vars(
            Some("ws://host:8000/ws".to_string()),
            Some("http://host:8000/".to_string()),
            Some("jwt".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("http://host:8000"));
        assert_eq!(config.api_token.as_deref(), Some("jwt"));
    }
}
