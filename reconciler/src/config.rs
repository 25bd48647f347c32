use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// Columns searched by every rewrite unless the configuration overrides them.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "option_value",
    "post_content",
    "post_excerpt",
    "post_content_filtered",
    "meta_value",
    "domain",
];

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Environment variable prefix cannot be empty")]
    EmptyEnvPrefix,

    #[error("Empty table name in {0} tables")]
    EmptyTableName(&'static str),

    #[error("Duplicate table name in {group} tables: {name}")]
    DuplicateTable { group: &'static str, name: String },

    #[error("At least one column must be searched")]
    EmptyColumns,

    #[error("Empty column name")]
    EmptyColumnName,

    #[error("Unsupported site scheme: {0}")]
    UnsupportedScheme(String),
}

/// Reconciliation settings.
///
/// Every field has a default so an absent or partial config file still
/// produces a usable configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Prefix prepended to every environment variable read (e.g. `PLATFORM_ROUTES`)
    pub env_prefix: String,
    /// Database base prefix. When unset the binary asks the site registry.
    pub table_prefix: Option<String>,
    /// Scheme used to derive a site's URL from its domain
    pub site_scheme: String,
    /// Abort the run when the primary route is missing or ambiguous
    pub strict_primary: bool,
    /// Rewrite primary routes after every other route
    pub primary_last: bool,
    pub tables: TableGroups,
    pub columns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            env_prefix: "PLATFORM_".into(),
            table_prefix: None,
            site_scheme: "https".into(),
            strict_primary: false,
            primary_last: true,
            tables: TableGroups::default(),
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.env_prefix.is_empty() {
            return Err(ValidationError::EmptyEnvPrefix);
        }

        if self.site_scheme != "https" && self.site_scheme != "http" {
            return Err(ValidationError::UnsupportedScheme(self.site_scheme.clone()));
        }

        self.tables.validate()?;

        if self.columns.is_empty() {
            return Err(ValidationError::EmptyColumns);
        }
        if self.columns.iter().any(|c| c.is_empty()) {
            return Err(ValidationError::EmptyColumnName);
        }

        Ok(())
    }
}

/// Base table names, without any prefix.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableGroups {
    /// Network-wide tables, never segmented by site id
    pub network: Vec<String>,
    /// Tables that exist once per site
    pub per_site: Vec<String>,
}

impl Default for TableGroups {
    fn default() -> Self {
        TableGroups {
            network: vec!["site".into(), "blogs".into(), "sitemeta".into()],
            per_site: vec!["options".into(), "posts".into(), "postmeta".into()],
        }
    }
}

impl TableGroups {
    fn validate(&self) -> Result<(), ValidationError> {
        for (group, names) in [("network", &self.network), ("per-site", &self.per_site)] {
            let mut seen = HashSet::new();
            for name in names {
                if name.is_empty() {
                    return Err(ValidationError::EmptyTableName(group));
                }
                if !seen.insert(name) {
                    return Err(ValidationError::DuplicateTable {
                        group,
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
