//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::normalize::NormalizeError;
use crate::scoring::ScoringError;

/// Errors raised while loading or validating configuration.
///
/// All of them are fatal and surface before any comparison runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {name} ('{value}'): {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Scoring weights failed to parse or validate.
    #[error("invalid scoring weights: {0}")]
    Scoring(#[from] ScoringError),

    /// Abbreviation or stop-word settings were rejected.
    #[error("invalid normalization settings: {0}")]
    Normalization(#[from] NormalizeError),

    /// Cascade thresholds are out of range or not monotonically ordered.
    #[error("invalid thresholds: {reason}")]
    InvalidThresholds { reason: String },

    /// Judge provider settings are incomplete or inconsistent.
    #[error("invalid judge configuration: {reason}")]
    InvalidJudge { reason: String },

    /// A numeric setting that must be positive was zero.
    #[error("{name} must be at least 1")]
    ZeroValue { name: &'static str },

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file.
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
