//! Rewrite ordering.
//!
//! Nested domains must be rewritten before their ancestors: rewriting
//! `old.example.com` first would also rewrite every `*.old.example.com`
//! reference, leaving the subdomain's own rewrite with nothing to match.
//! The number of dots in the production host is used as nesting depth.

use crate::routes::{Route, RouteTable};
use std::cmp::Ordering;
use url::Url;

/// Nesting depth of a route's production domain
pub fn specificity(route: &Route) -> usize {
    let Some(production_url) = route.production_url.as_deref() else {
        return 0;
    };
    match Url::parse(production_url) {
        Ok(url) => url.host_str().map_or(0, |host| host.matches('.').count()),
        Err(_) => production_url.matches('.').count(),
    }
}

/// More specific routes sort first, equal depths compare equal.
pub fn compare_specificity(a: &Route, b: &Route) -> Ordering {
    specificity(b).cmp(&specificity(a))
}

/// Orders routes for rewriting. The sort is stable, so routes of equal depth
/// keep their manifest order. With `primary_last`, primary routes are then
/// moved behind every other route so the network-wide pass runs last.
///
/// Depth never increases along the result when `primary_last` is off. When
/// it is on, that only holds for the non-primary routes: a primary that is
/// more specific than another route still comes after it.
pub fn order(routes: &RouteTable, primary_last: bool) -> Vec<&Route> {
    let mut ordered: Vec<&Route> = routes.iter().collect();
    ordered.sort_by(|a, b| compare_specificity(a, b));

    if primary_last {
        let (primary, mut rest): (Vec<&Route>, Vec<&Route>) =
            ordered.into_iter().partition(|route| route.primary);
        rest.extend(primary);
        ordered = rest;
    }

    ordered
}
