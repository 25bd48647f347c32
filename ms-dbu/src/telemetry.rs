use crate::config::{LoggingConfig, MetricsConfig};
use metrics_exporter_statsd::StatsdBuilder;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const METRICS_PREFIX: &str = "ms_dbu";

/// Installs the log subscriber. `RUST_LOG` overrides the default level.
/// Returns the sentry guard, which must be held until exit so queued
/// events are flushed.
pub fn init_logging(
    logging: Option<&LoggingConfig>,
    verbose: bool,
) -> Option<sentry::ClientInitGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // An unparsable DSN is rejected when the config file is loaded
    let guard = logging
        .and_then(|logging| logging.dsn().ok())
        .map(|dsn| {
            sentry::init(sentry::ClientOptions {
                dsn: Some(dsn),
                release: sentry::release_name!(),
                ..Default::default()
            })
        });
    let sentry_layer = guard
        .as_ref()
        .map(|_| sentry::integrations::tracing::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();

    guard
}

/// Sends metrics to statsd when configured; without it every metric is a no-op.
pub fn init_metrics(metrics: Option<&MetricsConfig>) {
    let Some(metrics) = metrics else {
        return;
    };

    match StatsdBuilder::from(metrics.statsd_host.as_str(), metrics.statsd_port)
        .build(Some(METRICS_PREFIX))
    {
        Ok(recorder) => {
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("Metrics recorder already installed");
                return;
            }
            shared::metrics_defs::describe_all(reconciler::metrics_defs::ALL_METRICS);
        }
        Err(e) => tracing::warn!(error = %e, "Could not set up statsd metrics"),
    }
}
