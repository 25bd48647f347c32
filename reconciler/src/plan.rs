use crate::routes::Route;
use crate::sites::SiteMatcher;
use crate::tables::TableTargetResolver;
use std::fmt;
use url::Url;

/// Why a route was left out of the rewrite
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("no site matches production URL {production_url}")]
    SiteNotFound { production_url: String },

    #[error("route has no production URL")]
    MissingProductionUrl,

    #[error("no host in URL {0}")]
    InvalidUrl(String),
}

/// A fully resolved rewrite for one route
#[derive(Clone, Debug, PartialEq)]
pub struct PlanEntry {
    pub route_url: String,
    pub blog_id: u64,
    /// Domain currently stored in the database
    pub search: String,
    /// Domain it is replaced with
    pub replace: String,
    pub tables: Vec<String>,
    pub columns: Vec<String>,
    /// URL of the matched site, scoping the rewrite
    pub url: String,
    /// Rewrite across the whole network instead of the matched site only
    pub network: bool,
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (site {}, {}, tables: {}, columns: {})",
            self.search,
            self.replace,
            self.blog_id,
            if self.network { "network" } else { self.url.as_str() },
            self.tables.join(","),
            self.columns.join(","),
        )
    }
}

/// Extracts the host from a full URL, dropping scheme, port and path
pub fn host_of(url: &str) -> Result<String, SkipReason> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .ok_or_else(|| SkipReason::InvalidUrl(url.to_string()))
}

pub struct PlanBuilder<'a> {
    matcher: SiteMatcher<'a>,
    tables: &'a TableTargetResolver,
    columns: &'a [String],
    scheme: &'a str,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(
        matcher: SiteMatcher<'a>,
        tables: &'a TableTargetResolver,
        columns: &'a [String],
        scheme: &'a str,
    ) -> Self {
        PlanBuilder {
            matcher,
            tables,
            columns,
            scheme,
        }
    }

    pub fn build(&self, route: &Route) -> Result<PlanEntry, SkipReason> {
        let production_url = route
            .production_url
            .as_deref()
            .ok_or(SkipReason::MissingProductionUrl)?;

        let site =
            self.matcher
                .find(production_url)
                .ok_or_else(|| SkipReason::SiteNotFound {
                    production_url: production_url.to_string(),
                })?;

        Ok(PlanEntry {
            route_url: route.url.clone(),
            blog_id: site.blog_id,
            search: host_of(production_url)?,
            replace: host_of(&route.url)?,
            tables: self.tables.resolve(site.blog_id),
            columns: self.columns.to_vec(),
            url: site.url(self.scheme),
            network: route.primary,
        })
    }
}
