//! Reconciles a multisite WordPress network against an environment's
//! routing manifest.
//!
//! A run parses the manifest, keeps the routes served by one application,
//! orders them so nested domains are handled before their ancestors, matches
//! each route to a registered site and rewrites the stale domain.

pub mod config;
pub mod environment;
pub mod errors;
pub mod executor;
pub mod manifest;
pub mod metrics_defs;
pub mod ordering;
pub mod plan;
pub mod primary;
pub mod routes;
pub mod sites;
pub mod tables;
pub mod wp_cli;

#[cfg(test)]
mod testutils;

use config::Config;
use environment::{EnvVars, Environment};
use errors::{ReconcileError, Result};
use executor::{Executor, Rewriter, RunReport};
use manifest::ManifestSource;
use metrics_defs::ROUTES_FILTERED;
use plan::PlanBuilder;
use shared::gauge;
use sites::{SiteLister, SiteMatcher};
use tables::TableTargetResolver;

/// Explicit overrides from the command line. Empty values count as absent.
#[derive(Clone, Debug, Default)]
pub struct Invocation {
    /// Raw JSON manifest
    pub routes: Option<String>,
    pub app_name: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub struct Reconciler<'a> {
    config: &'a Config,
    env: &'a dyn Environment,
    sites: &'a dyn SiteLister,
    rewriter: &'a dyn Rewriter,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        config: &'a Config,
        env: &'a dyn Environment,
        sites: &'a dyn SiteLister,
        rewriter: &'a dyn Rewriter,
    ) -> Self {
        Reconciler {
            config,
            env,
            sites,
            rewriter,
        }
    }

    /// Resolves the manifest source: the explicit argument as raw JSON,
    /// otherwise the base64 encoded environment value.
    pub fn manifest_source(&self, invocation: &Invocation) -> Result<ManifestSource> {
        match non_empty(&invocation.routes) {
            Some(routes) => Ok(ManifestSource::Raw(routes.to_string())),
            None => {
                let vars = EnvVars::new(self.env, &self.config.env_prefix);
                Ok(ManifestSource::Encoded(vars.routes()?))
            }
        }
    }

    pub fn app_name(&self, invocation: &Invocation) -> Result<String> {
        match non_empty(&invocation.app_name) {
            Some(app_name) => Ok(app_name.to_string()),
            None => EnvVars::new(self.env, &self.config.env_prefix).application_name(),
        }
    }

    /// Runs the whole reconciliation. Configuration and manifest problems
    /// abort before any rewrite; per-route problems end up in the report.
    pub fn run(&self, invocation: &Invocation) -> Result<RunReport> {
        self.config.validate()?;

        let source = self.manifest_source(invocation)?;
        let app_name = self.app_name(invocation)?;
        let all_routes = source.parse()?;

        let routes = all_routes.filter_by_upstream(&app_name);
        gauge!(ROUTES_FILTERED).set(routes.len() as f64);
        tracing::info!(
            app = %app_name,
            total = all_routes.len(),
            filtered = routes.len(),
            "Filtered routes"
        );
        for route in routes.iter() {
            tracing::debug!(
                route = %route.url,
                production_url = ?route.production_url,
                primary = route.primary,
                "Filtered route"
            );
        }

        match primary::resolve(&routes) {
            Ok(primary) => tracing::info!(
                replace = primary.replace_url(),
                search = ?primary.search_url(),
                "Resolved primary route"
            ),
            Err(e) if self.config.strict_primary => {
                return Err(ReconcileError::PrimaryDomainAmbiguous {
                    app: app_name,
                    count: e.count,
                });
            }
            Err(e) => tracing::warn!(
                app = %app_name,
                count = e.count,
                "Expected exactly one primary route, continuing"
            ),
        }

        let ordered = ordering::order(&routes, self.config.primary_last);

        let sites = self.sites.list_sites()?;
        let table_prefix = match &self.config.table_prefix {
            Some(prefix) => prefix.clone(),
            None => self.sites.table_prefix()?,
        };
        tracing::debug!(
            sites = sites.len(),
            table_prefix = %table_prefix,
            "Loaded site registry"
        );

        let resolver = TableTargetResolver::new(table_prefix, self.config.tables.clone());
        let planner = PlanBuilder::new(
            SiteMatcher::new(&sites, &self.config.site_scheme),
            &resolver,
            &self.config.columns,
            &self.config.site_scheme,
        );

        Ok(Executor::new(planner, self.rewriter).execute(&ordered))
    }
}
