//! Shared configuration and domain types for the `ordersweep` workspace.

mod app_config;
mod config;
mod outcome;
mod profile;

use thiserror::Error;

pub use app_config::{AdminEndpoint, AppConfig, MAX_PAGE_SIZE};
pub use config::{load_app_config, load_app_config_from_env};
pub use outcome::{OutcomeRecord, OutcomeStatus};
pub use profile::{
    load_profiles, DiscountKind, DiscountSettings, ProfilesFile, RefundSettings, ReissueProfile,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profiles file {path}: {source}")]
    ProfilesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profiles file: {0}")]
    ProfilesFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
