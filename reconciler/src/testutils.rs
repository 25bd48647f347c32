use crate::executor::{RewriteError, Rewriter};
use crate::plan::PlanEntry;
use crate::sites::{RegistryError, Site, SiteLister};
use std::cell::RefCell;
use std::collections::HashSet;

pub const SCENARIO_MANIFEST: &str = r#"{
    "https://a.example.com/": {"upstream": "app", "primary": true, "production_url": "https://old.example.com/"},
    "https://sub.a.example.com/": {"upstream": "app", "primary": false, "production_url": "https://sub.old.example.com/"}
}"#;

pub struct StaticSites(pub Vec<Site>);

impl SiteLister for StaticSites {
    fn list_sites(&self) -> Result<Vec<Site>, RegistryError> {
        Ok(self.0.clone())
    }

    fn table_prefix(&self) -> Result<String, RegistryError> {
        Ok("wp_".into())
    }
}

pub struct UnavailableSites;

impl SiteLister for UnavailableSites {
    fn list_sites(&self) -> Result<Vec<Site>, RegistryError> {
        Err(RegistryError::Command {
            status: "exit status: 1".into(),
            output: "Error: This is not a multisite installation.".into(),
        })
    }

    fn table_prefix(&self) -> Result<String, RegistryError> {
        Ok("wp_".into())
    }
}

/// Records every rewrite and fails the ones searching for a listed domain
#[derive(Default)]
pub struct RecordingRewriter {
    calls: RefCell<Vec<PlanEntry>>,
    fail_for: HashSet<String>,
}

impl RecordingRewriter {
    pub fn failing_for<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RecordingRewriter {
            calls: RefCell::default(),
            fail_for: domains.into_iter().map(Into::into).collect(),
        }
    }

    pub fn calls(&self) -> Vec<PlanEntry> {
        self.calls.borrow().clone()
    }
}

impl Rewriter for RecordingRewriter {
    fn rewrite(&self, entry: &PlanEntry) -> Result<String, RewriteError> {
        self.calls.borrow_mut().push(entry.clone());
        if self.fail_for.contains(&entry.search) {
            return Err(RewriteError::Failed {
                status: "exit status: 1".into(),
                output: format!("Error: could not replace {}", entry.search),
            });
        }
        Ok(format!("Success: Made 1 replacement of {}.", entry.search))
    }
}
