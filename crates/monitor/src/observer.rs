//! Headless stream consumer.
//!
//! Opens a jobs subscription and a telemetry subscription, optionally
//! seeds the job ledger from the REST API, then folds stream deltas
//! into the ledger and logs each job's derived pipeline stages. This is
//! the same reconciliation the dashboard pages perform, minus the
//! rendering.

use etta_api::client::ApiClient;
use etta_core::ledger::JobLedger;
use etta_core::pipeline::{derive_stage_statuses, StageStatus, TRANSFORM_STAGES};
use etta_core::session::Session;
use etta_core::telemetry::TelemetryPulse;
use etta_stream::backoff::ReconnectPolicy;
use etta_stream::messages::StreamMessage;
use etta_stream::subscription::{ConnectionStatus, Subscription};

use crate::config::MonitorConfig;

/// Run the monitor until Ctrl-C or until the jobs stream becomes
/// permanently unavailable.
pub async fn run(config: MonitorConfig) {
    let session = match &config.api_token {
        Some(token) => Session::with_token(token.clone()),
        None => Session::new(),
    };

    let mut ledger = JobLedger::new();

    if let Some(api_base) = &config.api_base_url {
        let api = ApiClient::new(api_base.clone(), session.clone());
        match api.list_jobs().await {
            Ok(jobs) => {
                tracing::info!(count = jobs.len(), "Seeded job ledger from the API");
                ledger.seed(jobs);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to seed job ledger, starting empty");
            }
        }
    }

    let jobs = Subscription::open(config.jobs_url(), ReconnectPolicy::default());
    let telemetry = Subscription::open(config.telemetry_url(), ReconnectPolicy::default());

    let mut jobs_latest = jobs.latest_rx();
    let mut jobs_status = jobs.status_rx();
    let mut telemetry_latest = telemetry.latest_rx();
    let mut telemetry_live = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }

            changed = jobs_latest.changed() => match changed {
                Ok(()) => {
                    let message = jobs_latest.borrow_and_update().clone();
                    if let Some(message) = message {
                        fold_job_message(&mut ledger, &message);
                    }
                }
                Err(_) => {
                    // The subscription task only exits at the retry
                    // ceiling; the stream is gone for good.
                    tracing::error!("Jobs stream unavailable, exiting");
                    break;
                }
            },

            changed = jobs_status.changed() => match changed {
                Ok(()) => {
                    let status = *jobs_status.borrow_and_update();
                    match status {
                        ConnectionStatus::Open => tracing::info!("Jobs stream connected"),
                        ConnectionStatus::Closed => {
                            tracing::warn!("Jobs stream disconnected, reconnecting")
                        }
                        ConnectionStatus::Connecting => {}
                    }
                }
                Err(_) => {
                    tracing::error!("Jobs stream unavailable, exiting");
                    break;
                }
            },

            changed = telemetry_latest.changed(), if telemetry_live => match changed {
                Ok(()) => {
                    let message = telemetry_latest.borrow_and_update().clone();
                    if let Some(StreamMessage::TelemetryPulse(pulse)) = message {
                        log_pulse(&pulse);
                    }
                }
                Err(_) => {
                    // Telemetry is best-effort; keep watching jobs.
                    telemetry_live = false;
                    tracing::warn!("Telemetry stream unavailable");
                }
            },
        }
    }

    jobs.close().await;
    telemetry.close().await;
}

/// Fold one stream message into the ledger and log the result.
///
/// Job updates (plain and Nexus) merge into the ledger; everything else
/// is noted at trace level and dropped.
pub fn fold_job_message(ledger: &mut JobLedger, message: &StreamMessage) {
    let delta = match message {
        StreamMessage::JobUpdate(delta) | StreamMessage::NexusJobUpdate(delta) => delta,
        StreamMessage::Ping { .. } => {
            tracing::trace!("Server keep-alive");
            return;
        }
        StreamMessage::TelemetryPulse(_) => return,
        StreamMessage::Unknown { kind, .. } => {
            tracing::trace!(kind = %kind, "Ignoring unrecognized message kind");
            return;
        }
    };

    let job = ledger.apply(delta);
    let stages = derive_stage_statuses(TRANSFORM_STAGES.len(), job.status, job.progress);

    tracing::info!(
        job_id = %job.id,
        status = %job.status,
        progress = job.progress,
        stages = %render_stages(&stages),
        "Job update",
    );
}

/// Compact one-line rendering of a stage sequence, e.g. `##>.`.
fn render_stages(stages: &[StageStatus]) -> String {
    stages
        .iter()
        .map(|stage| match stage {
            StageStatus::Pending => '.',
            StageStatus::Active => '>',
            StageStatus::Complete => '#',
            StageStatus::Error => '!',
        })
        .collect()
}

fn log_pulse(pulse: &TelemetryPulse) {
    tracing::debug!(
        bitrate = pulse.metrics.bitrate,
        latency = pulse.metrics.latency,
        active_nodes = pulse.metrics.active_nodes,
        global_velocity = pulse.metrics.global_velocity,
        segments = pulse.active_segments.len(),
        geo_points = pulse.geo_activity.len(),
        "Telemetry pulse",
    );
}
