use thiserror::Error;

/// Errors raised while building a [`Normalizer`](super::Normalizer).
///
/// Normalizing text never fails; only dictionary construction can.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("abbreviation key cannot be empty")]
    EmptyAbbreviation,

    #[error("expansion of '{key}' -> '{expansion}' contains another abbreviation key")]
    RecursiveExpansion { key: String, expansion: String },

    #[error("invalid abbreviation entry '{entry}': expected 'key=expansion'")]
    MalformedEntry { entry: String },
}
