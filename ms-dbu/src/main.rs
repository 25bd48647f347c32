use clap::Parser;
use reconciler::environment::ProcessEnvironment;
use reconciler::errors::ReconcileError;
use reconciler::executor::{RouteOutcome, RunReport};
use reconciler::wp_cli::WpCli;
use reconciler::{Invocation, Reconciler};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod telemetry;

use config::Config;

/// Updates WordPress multisite domains in non-production environments on Platform.sh.
///
/// Each route served by the application replaces the production domain it
/// was created from. Nested domains are rewritten before their parents and
/// the primary domain is rewritten last, network wide.
#[derive(Parser)]
#[command(name = "ms-dbu", version)]
struct Cli {
    /// JSON object that describes the routes for the environment.
    /// Defaults to the base64 encoded PLATFORM_ROUTES.
    #[arg(long)]
    routes: Option<String>,
    /// The app name as set in your app configuration.
    /// Defaults to PLATFORM_APPLICATION_NAME.
    #[arg(long)]
    app_name: Option<String>,
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Report what would change without writing to the database
    #[arg(long)]
    dry_run: bool,
    /// Log the filtered routes and every planned rewrite
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let _sentry = telemetry::init_logging(config.logging.as_ref(), cli.verbose || cli.dry_run);
    telemetry::init_metrics(config.metrics.as_ref());

    match run(&cli, &config) {
        Ok(report) => ExitCode::from(summarize(&report)),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<RunReport, ReconcileError> {
    let wp = WpCli::new(config.wp_cli.clone(), cli.dry_run);
    let invocation = Invocation {
        routes: cli.routes.clone(),
        app_name: cli.app_name.clone(),
    };
    let env = ProcessEnvironment;

    Reconciler::new(&config.reconciler, &env, &wp, &wp).run(&invocation)
}

/// Logs every outcome and returns the process exit status: 1 when any
/// rewrite failed, 0 otherwise.
fn summarize(report: &RunReport) -> u8 {
    for outcome in &report.outcomes {
        match outcome {
            RouteOutcome::Rewritten { entry, .. } => {
                tracing::debug!(route = %outcome.route_url(), plan = %entry, "Rewritten")
            }
            RouteOutcome::Skipped { reason, .. } => {
                tracing::warn!(route = %outcome.route_url(), %reason, "Skipped")
            }
            RouteOutcome::Failed { error, .. } => {
                tracing::error!(route = %outcome.route_url(), %error, "Failed")
            }
        }
    }

    if report.is_success() {
        tracing::info!(
            rewritten = report.rewritten(),
            skipped = report.skipped(),
            "All domains have been updated!"
        );
        0
    } else {
        tracing::error!(
            rewritten = report.rewritten(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Some domains could not be updated"
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconciler::executor::RewriteError;
    use reconciler::plan::{PlanEntry, SkipReason};

    fn entry(search: &str) -> PlanEntry {
        PlanEntry {
            route_url: format!("https://{search}/"),
            blog_id: 1,
            search: search.into(),
            replace: "new.example.com".into(),
            tables: vec!["wp_options".into()],
            columns: vec!["option_value".into()],
            url: format!("https://{search}/"),
            network: false,
        }
    }

    #[test]
    fn test_exit_status() {
        let mut report = RunReport::default();
        assert_eq!(summarize(&report), 0);

        report.outcomes.push(RouteOutcome::Skipped {
            route_url: "https://gone.example.com/".into(),
            reason: SkipReason::MissingProductionUrl,
        });
        report.outcomes.push(RouteOutcome::Rewritten {
            entry: entry("old.example.com"),
            output: "Success".into(),
        });
        assert_eq!(summarize(&report), 0);

        report.outcomes.push(RouteOutcome::Failed {
            entry: entry("sub.old.example.com"),
            error: RewriteError::Failed {
                status: "exit status: 1".into(),
                output: "Error: table not found".into(),
            },
        });
        assert_eq!(summarize(&report), 1);
    }
}
