//! Error types for quill-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// A run mode string that is neither development nor production.
    #[error("unknown run mode '{0}'; expected: development, production")]
    InvalidRunMode(String),

    /// One side of the directive delimiter pair is empty.
    #[error("template delimiters must not be empty")]
    EmptyDelimiter,
}
