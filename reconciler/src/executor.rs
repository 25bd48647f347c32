use crate::metrics_defs::{REWRITE_DURATION, REWRITE_FAILED, REWRITE_SUCCEEDED, ROUTES_SKIPPED};
use crate::plan::{PlanBuilder, PlanEntry, SkipReason};
use crate::routes::Route;
use shared::{counter, histogram};
use std::io;
use std::time::Instant;

#[derive(thiserror::Error, Debug)]
pub enum RewriteError {
    #[error("could not run rewrite: {0}")]
    Io(#[from] io::Error),

    #[error("rewrite exited with {status}: {output}")]
    Failed { status: String, output: String },
}

/// The search-and-replace primitive. Implementations run one rewrite to
/// completion and return its diagnostic output.
pub trait Rewriter {
    fn rewrite(&self, entry: &PlanEntry) -> Result<String, RewriteError>;
}

#[derive(Debug)]
pub enum RouteOutcome {
    Rewritten { entry: PlanEntry, output: String },
    Skipped { route_url: String, reason: SkipReason },
    Failed { entry: PlanEntry, error: RewriteError },
}

impl RouteOutcome {
    pub fn route_url(&self) -> &str {
        match self {
            RouteOutcome::Rewritten { entry, .. } | RouteOutcome::Failed { entry, .. } => {
                &entry.route_url
            }
            RouteOutcome::Skipped { route_url, .. } => route_url,
        }
    }
}

/// Outcome of every route, in processing order. A run can end partially
/// applied; there is no rollback.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<RouteOutcome>,
}

impl RunReport {
    pub fn rewritten(&self) -> usize {
        self.count(|o| matches!(o, RouteOutcome::Rewritten { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RouteOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RouteOutcome::Failed { .. }))
    }

    /// False when any rewrite failed. Skipped routes do not fail the run.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count<F: Fn(&RouteOutcome) -> bool>(&self, f: F) -> usize {
        self.outcomes.iter().filter(|&o| f(o)).count()
    }
}

/// Applies rewrites one route at a time. Each rewrite completes before the
/// next is planned; a skipped or failed route never stops the ones after it.
pub struct Executor<'a> {
    planner: PlanBuilder<'a>,
    rewriter: &'a dyn Rewriter,
}

impl<'a> Executor<'a> {
    pub fn new(planner: PlanBuilder<'a>, rewriter: &'a dyn Rewriter) -> Self {
        Executor { planner, rewriter }
    }

    pub fn execute(&self, routes: &[&Route]) -> RunReport {
        let outcomes = routes.iter().map(|route| self.execute_one(route)).collect();
        RunReport { outcomes }
    }

    fn execute_one(&self, route: &Route) -> RouteOutcome {
        let entry = match self.planner.build(route) {
            Ok(entry) => entry,
            Err(reason) => {
                tracing::warn!(route = %route.url, %reason, "Skipping route");
                counter!(ROUTES_SKIPPED).increment(1);
                return RouteOutcome::Skipped {
                    route_url: route.url.clone(),
                    reason,
                };
            }
        };

        tracing::debug!(route = %route.url, plan = %entry, "Rewriting route");
        let started = Instant::now();
        let result = self.rewriter.rewrite(&entry);
        histogram!(REWRITE_DURATION).record(started.elapsed().as_secs_f64());

        match result {
            Ok(output) => {
                tracing::info!(
                    search = %entry.search,
                    replace = %entry.replace,
                    network = entry.network,
                    "Updated domain"
                );
                tracing::debug!(output = %output.trim(), "Rewrite output");
                counter!(REWRITE_SUCCEEDED).increment(1);
                RouteOutcome::Rewritten { entry, output }
            }
            Err(error) => {
                tracing::error!(
                    search = %entry.search,
                    replace = %entry.replace,
                    error = %error,
                    "Failed to update domain"
                );
                counter!(REWRITE_FAILED).increment(1);
                RouteOutcome::Failed { entry, error }
            }
        }
    }
}
