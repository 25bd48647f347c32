use crate::config::ValidationError;
use crate::manifest::ManifestError;
use crate::sites::RegistryError;
use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T, E = ReconcileError> = std::result::Result<T, E>;

/// Errors that stop a run before any rewrite happens
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("{name} is not set or empty. Are you sure you're running on Platform.sh?")]
    ConfigMissing { name: String },

    #[error("Unable to parse route information. Is it valid JSON? {0}")]
    InvalidManifest(#[from] ManifestError),

    #[error("Expected exactly one primary route for app {app}, found {count}")]
    PrimaryDomainAmbiguous { app: String, count: usize },

    #[error("Site registry error: {0}")]
    SiteRegistry(#[from] RegistryError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),
}
