use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while building or inspecting fixtures.
///
/// Teardown never produces one of these; cleanup failures are logged and skipped.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to create fixture directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write fixture {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture '{name}' needs at least {header_len} bytes for its signature, requested {requested}")]
    SizeBelowHeader {
        name: String,
        header_len: u64,
        requested: u64,
    },

    #[error("fixture '{name}' is {size} bytes but must stay under the {limit}-byte {surface} limit")]
    ExceedsSurfaceLimit {
        name: String,
        size: u64,
        limit: u64,
        surface: &'static str,
    },

    #[error("random source failed: {0}")]
    Random(#[from] rand::Error),

    #[error("failed to inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to serialize fixture manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FixtureError>;
