use thiserror::Error;

use crate::config::ConfigError;
use crate::dataset::InputError;

/// Fatal engine errors. Raised before any comparison runs.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, MatchError>;
