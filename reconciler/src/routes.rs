//! Route table built from the routing manifest.
//!
//! The manifest maps each target URL to its attributes. Key order from the
//! manifest is kept so that filtering and ordering are deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Route {
    /// Target URL, the manifest key
    #[serde(skip)]
    pub url: String,
    /// Application serving this route. Redirect routes have none.
    #[serde(default)]
    pub upstream: Option<String>,
    /// URL stored in the database that this route replaces
    #[serde(default)]
    pub production_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub primary: bool,
    /// Remaining attributes, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Route {
    /// True when this route's upstream is exactly `app_name`
    pub fn is_served_by(&self, app_name: &str) -> bool {
        self.upstream.as_deref() == Some(app_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteTable {
    routes: IndexMap<String, Route>,
}

impl RouteTable {
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in manifest order
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Returns the routes served by `app_name`, preserving manifest order.
    /// An empty result is not an error here.
    pub fn filter_by_upstream(&self, app_name: &str) -> RouteTable {
        self.iter()
            .filter(|route| route.is_served_by(app_name))
            .map(|route| (route.url.clone(), route.clone()))
            .collect()
    }
}

impl FromIterator<(String, Route)> for RouteTable {
    fn from_iter<T: IntoIterator<Item = (String, Route)>>(iter: T) -> Self {
        let routes = iter
            .into_iter()
            .map(|(url, mut route)| {
                route.url = url.clone();
                (url, route)
            })
            .collect();
        RouteTable { routes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: Value) -> RouteTable {
        serde_json::from_value::<IndexMap<String, Route>>(value)
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_filter_by_upstream() {
        let routes = table(json!({
            "https://a.example.com/": {"upstream": "app", "primary": true, "production_url": "https://a.com/"},
            "https://api.example.com/": {"upstream": "api", "primary": false, "production_url": "https://api.com/"},
            "https://www.example.com/": {"type": "redirect", "to": "https://a.example.com/"},
            "https://b.example.com/": {"upstream": "app:http", "primary": false, "production_url": "https://b.com/"},
            "https://c.example.com/": {"upstream": "application", "production_url": "https://c.com/"},
        }));
        assert_eq!(routes.len(), 5);

        let filtered = routes.filter_by_upstream("app");
        let urls: Vec<_> = filtered.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.example.com/"]);
        assert!(filtered.iter().all(|r| r.is_served_by("app")));

        // Every route served by the app is kept
        let expected = routes.iter().filter(|r| r.is_served_by("app")).count();
        assert_eq!(filtered.len(), expected);

        // Upstreams compare whole, endpoint suffix included
        let filtered = routes.filter_by_upstream("app:http");
        let urls: Vec<_> = filtered.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://b.example.com/"]);

        assert!(routes.filter_by_upstream("missing").is_empty());
    }

    #[test]
    fn test_route_attributes() {
        let routes = table(json!({
            "https://a.example.com/": {
                "upstream": "app",
                "primary": null,
                "production_url": "https://a.com/",
                "id": "main",
                "attributes": {}
            },
        }));
        let route = routes.iter().next().unwrap();
        assert_eq!(route.url, "https://a.example.com/");
        assert!(!route.primary);
        assert_eq!(route.production_url.as_deref(), Some("https://a.com/"));
        assert_eq!(route.extra.get("id"), Some(&json!("main")));
        assert!(route.extra.contains_key("attributes"));
    }
}
