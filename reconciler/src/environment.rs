//! Access to the process environment behind a capability trait, so the
//! reconciler can be driven from tests without mutating real env vars.

use crate::errors::ReconcileError;
use std::collections::HashMap;

pub const APPLICATION_NAME: &str = "APPLICATION_NAME";
pub const ROUTES: &str = "ROUTES";

pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables
#[derive(Debug, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        MapEnvironment {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Reads prefixed variables, treating empty values the same as absent ones.
pub struct EnvVars<'a> {
    env: &'a dyn Environment,
    prefix: &'a str,
}

impl<'a> EnvVars<'a> {
    pub fn new(env: &'a dyn Environment, prefix: &'a str) -> Self {
        EnvVars { env, prefix }
    }

    pub fn require(&self, name: &str) -> Result<String, ReconcileError> {
        let full_name = format!("{}{}", self.prefix, name);
        match self.env.var(&full_name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ReconcileError::ConfigMissing { name: full_name }),
        }
    }

    pub fn application_name(&self) -> Result<String, ReconcileError> {
        self.require(APPLICATION_NAME)
    }

    /// The base64 encoded route manifest
    pub fn routes(&self) -> Result<String, ReconcileError> {
        self.require(ROUTES)
    }
}
