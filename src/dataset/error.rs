use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading input tables. Fatal for the affected dataset.
#[derive(Debug, Error)]
pub enum InputError {
    /// A configured column is absent from the dataset.
    #[error("dataset '{dataset}' has no column '{column}'")]
    MissingColumn { dataset: String, column: String },

    /// A row has no usable id.
    #[error("dataset '{dataset}' row {row}: missing id")]
    MissingId { dataset: String, row: usize },

    /// A row uses the id reserved for the No-Match placeholder.
    #[error("dataset '{dataset}' row {row}: id '{id}' is reserved")]
    ReservedId {
        dataset: String,
        row: usize,
        id: String,
    },

    #[error("failed to read dataset '{dataset}': {source}")]
    Io {
        dataset: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON-lines record could not be parsed.
    #[error("dataset '{dataset}' line {line}: {source}")]
    InvalidJson {
        dataset: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON-lines record was valid JSON but not an object.
    #[error("dataset '{dataset}' line {line}: expected a JSON object")]
    NotAnObject { dataset: String, line: usize },

    /// A flat output row could not be re-parsed.
    #[error("invalid flat row: {reason}")]
    InvalidFlatRow { reason: String },
}

/// Result alias for dataset operations.
pub type InputResult<T> = Result<T, InputError>;
