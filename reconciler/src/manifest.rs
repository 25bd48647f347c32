use crate::routes::{Route, RouteTable};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use indexmap::IndexMap;
use std::str::FromStr;

/// Where a route manifest came from. Values read from the environment are
/// always base64 wrapped, values passed on the command line are raw JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum ManifestSource {
    Raw(String),
    Encoded(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ManifestSource {
    pub fn parse(&self) -> Result<RouteTable, ManifestError> {
        match self {
            ManifestSource::Raw(json) => json.parse(),
            ManifestSource::Encoded(encoded) => {
                let decoded = STANDARD.decode(encoded.trim().as_bytes())?;
                parse_json(&decoded)
            }
        }
    }
}

impl FromStr for RouteTable {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_json(s.as_bytes())
    }
}

fn parse_json(data: &[u8]) -> Result<RouteTable, ManifestError> {
    let routes: IndexMap<String, Route> = serde_json::from_slice(data)?;
    Ok(routes.into_iter().collect())
}
