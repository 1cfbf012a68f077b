//! Transformer error types.

use bundler_map::MalformedInputError;
use camino::Utf8PathBuf;
use source_map::InvalidMapError;
use thiserror::Error;

use crate::EngineError;

/// An error while obfuscating a file.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The engine returned no source map although one was needed to compose
    /// with the upstream map.
    #[error("obfuscation engine did not return a source map for {filename}")]
    MissingUpstreamMap {
        /// The file being transformed.
        filename: String,
    },

    /// A standard source map failed validation.
    #[error(transparent)]
    InvalidMap(#[from] InvalidMapError),

    /// A raw bundler map could not be normalized.
    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),

    /// The upstream transformer, code generator or engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// An error loading transformer options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The options file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The options are not valid JSON for this shape.
    #[error("invalid transformer options: {0}")]
    Json(#[from] serde_json::Error),

    /// An include or exclude pattern is not a valid glob.
    #[error("invalid file pattern: {0}")]
    Glob(#[from] globset::Error),
}
