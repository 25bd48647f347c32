use crate::routes::{Route, RouteTable};

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("expected exactly one primary route, found {count}")]
pub struct AmbiguousPrimary {
    pub count: usize,
}

/// The canonical domain of an application's route set
#[derive(Debug, PartialEq)]
pub struct PrimaryDomain<'a> {
    pub route: &'a Route,
}

impl<'a> PrimaryDomain<'a> {
    /// The URL every other domain is rewritten towards
    pub fn replace_url(&self) -> &'a str {
        &self.route.url
    }

    /// The URL currently stored in the database
    pub fn search_url(&self) -> Option<&'a str> {
        self.route.production_url.as_deref()
    }
}

/// All routes flagged primary, in manifest order
pub fn primaries(routes: &RouteTable) -> Vec<&Route> {
    routes.iter().filter(|route| route.primary).collect()
}

/// Resolves the single primary route. Zero or several primaries is reported
/// as `AmbiguousPrimary`; the caller decides whether that is fatal.
pub fn resolve(routes: &RouteTable) -> Result<PrimaryDomain<'_>, AmbiguousPrimary> {
    match primaries(routes).as_slice() {
        [route] => Ok(PrimaryDomain { route }),
        other => Err(AmbiguousPrimary { count: other.len() }),
    }
}
