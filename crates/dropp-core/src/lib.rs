pub mod app_config;
pub mod config;
pub mod diff;
pub mod items;
pub mod snapshot;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use diff::{diff_snapshots, DiffOutcome};
pub use items::{load_items, parse_items, ItemConfig, ItemsFile, SourceConfig, SourceKind};
pub use snapshot::{ItemIdentity, Snapshot, SnapshotDiff, TrackedField};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read items file {path}: {source}")]
    ItemsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse items file: {0}")]
    ItemsFileParse(#[from] serde_yaml::Error),

    #[error("items validation failed: {0}")]
    Validation(String),
}
