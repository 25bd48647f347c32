//! Site registry and search-and-replace backed by the `wp` command.

use crate::executor::{RewriteError, Rewriter};
use crate::plan::PlanEntry;
use crate::sites::{RegistryError, Site, SiteLister};
use serde::Deserialize;
use std::process::{Command, Output};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WpCliConfig {
    /// wp-cli executable
    pub binary: String,
    /// WordPress installation path, passed as `--path`
    pub path: Option<String>,
    /// Appended to every invocation (e.g. `--allow-root`)
    pub extra_args: Vec<String>,
}

impl Default for WpCliConfig {
    fn default() -> Self {
        WpCliConfig {
            binary: "wp".into(),
            path: None,
            extra_args: Vec::new(),
        }
    }
}

pub struct WpCli {
    config: WpCliConfig,
    dry_run: bool,
}

impl WpCli {
    pub fn new(config: WpCliConfig, dry_run: bool) -> Self {
        WpCli { config, dry_run }
    }

    fn run<I, S>(&self, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut command = Command::new(&self.config.binary);
        command.args(args);
        if let Some(path) = &self.config.path {
            command.arg(format!("--path={path}"));
        }
        command.args(&self.config.extra_args);
        tracing::debug!(command = ?command, "Running wp-cli");
        command.output()
    }

    /// Runs a read-only command, failing on a non-zero exit
    fn query<I, S>(&self, args: I) -> Result<Vec<u8>, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = self.run(args)?;
        if !output.status.success() {
            return Err(RegistryError::Command {
                status: output.status.to_string(),
                output: combined_output(&output),
            });
        }
        Ok(output.stdout)
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

pub const SITE_LIST_ARGS: &[&str] = &[
    "site",
    "list",
    "--fields=blog_id,domain,path",
    "--format=json",
];

/// Arguments of `wp search-replace` for one plan entry
pub fn search_replace_args(entry: &PlanEntry, dry_run: bool) -> Vec<String> {
    let mut args = vec![
        "search-replace".to_string(),
        entry.search.clone(),
        entry.replace.clone(),
    ];
    args.extend(entry.tables.iter().cloned());
    args.push(format!("--include-columns={}", entry.columns.join(",")));
    args.push(format!("--url={}", entry.url));
    if entry.network {
        args.push("--network".into());
    }
    if dry_run {
        args.push("--dry-run".into());
    }
    args.push("--report-changed-only".into());
    args
}

impl SiteLister for WpCli {
    fn list_sites(&self) -> Result<Vec<Site>, RegistryError> {
        let stdout = self.query(SITE_LIST_ARGS)?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    fn table_prefix(&self) -> Result<String, RegistryError> {
        let stdout = self.query(["db", "prefix"])?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

impl Rewriter for WpCli {
    fn rewrite(&self, entry: &PlanEntry) -> Result<String, RewriteError> {
        let output = self.run(search_replace_args(entry, self.dry_run))?;
        let text = combined_output(&output);
        if output.status.success() {
            Ok(text)
        } else {
            Err(RewriteError::Failed {
                status: output.status.to_string(),
                output: text,
            })
        }
    }
}
