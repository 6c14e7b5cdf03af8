use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ConfigError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config path has no parent directory: {0}")]
    BadPath(PathBuf),
}
