use serde::{Deserialize, Deserializer};
use std::io;
use url::Url;

/// Id of the network's root site. Its tables carry no site segment.
pub const ROOT_SITE_ID: u64 = 1;

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("command exited with {status}: {output}")]
    Command { status: String, output: String },

    #[error("could not parse site list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of the sites registered in the network
pub trait SiteLister {
    fn list_sites(&self) -> Result<Vec<Site>, RegistryError>;

    /// Base prefix of the network's tables
    fn table_prefix(&self) -> Result<String, RegistryError>;
}

/// One site registered in the network
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Site {
    #[serde(deserialize_with = "string_or_number")]
    pub blog_id: u64,
    pub domain: String,
    #[serde(default = "root_path")]
    pub path: String,
}

fn root_path() -> String {
    "/".into()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    match Id::deserialize(deserializer)? {
        Id::Number(id) => Ok(id),
        Id::Text(id) => id.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl Site {
    pub fn new<D: Into<String>>(blog_id: u64, domain: D) -> Self {
        Site {
            blog_id,
            domain: domain.into(),
            path: root_path(),
        }
    }

    /// URL derived from the scheme, domain and path
    pub fn url(&self, scheme: &str) -> String {
        format!("{}://{}{}", scheme, self.domain, self.path)
    }
}

/// Host and path used to compare a site against a production URL. The
/// scheme is ignored; a trailing slash on the path is not significant.
fn site_key(url: &Url) -> Option<(String, String)> {
    let host = url.host_str()?.to_ascii_lowercase();
    let path = url.path().trim_end_matches('/').to_string();
    Some((host, path))
}

/// Finds the site a route's production URL belongs to
pub struct SiteMatcher<'a> {
    sites: &'a [Site],
    scheme: &'a str,
}

impl<'a> SiteMatcher<'a> {
    pub fn new(sites: &'a [Site], scheme: &'a str) -> Self {
        SiteMatcher { sites, scheme }
    }

    pub fn find(&self, production_url: &str) -> Option<&'a Site> {
        let wanted = site_key(&Url::parse(production_url).ok()?)?;
        self.sites.iter().find(|site| {
            Url::parse(&site.url(self.scheme))
                .ok()
                .and_then(|url| site_key(&url))
                .is_some_and(|key| key == wanted)
        })
    }
}
