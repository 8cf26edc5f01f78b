//! `etta-monitor` -- headless real-time job/telemetry watcher.
//!
//! Subscribes to the ettametta streaming endpoints, reconciles job
//! updates into an in-memory ledger, and logs pipeline stage
//! transitions. Useful for tailing a deployment without the dashboard.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default | Description                              |
//! |-----------------------|----------|---------|------------------------------------------|
//! | `ETTAMETTA_WS_URL`    | yes      | --      | WebSocket base, e.g. `ws://host:8000/ws` |
//! | `ETTAMETTA_API_URL`   | no       | --      | REST base for seeding the job list       |
//! | `ETTAMETTA_API_TOKEN` | no       | --      | Bearer token for the REST base           |

use etta_monitor::config::MonitorConfig;
use etta_monitor::observer;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "etta_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        ws_base = %config.ws_base_url,
        api_base = config.api_base_url.as_deref().unwrap_or("<none>"),
        "Starting etta-monitor",
    );

    observer::run(config).await;
}
