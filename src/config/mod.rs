//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `NAMECASCADE_*` environment variables,
//! then call [`Config::validate`] before building an engine.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{ConfigError, ConfigResult};

use std::env;
use std::path::PathBuf;

use crate::cascade::CascadeConfig;
use crate::constants::{
    DEFAULT_MAX_WORKERS, DEFAULT_MIN_SCORE_THRESHOLD, DEFAULT_TOP_N_MATCHES, SCORE_SCALE,
};
use crate::judge::JudgeConfig;
use crate::normalize::{Normalizer, NormalizerConfig};
use crate::scoring::ScoringWeights;

/// Column names used to pull id and name cells out of the input datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    pub query_id: String,
    pub query_name: String,
    pub reference_id: String,
    pub reference_name: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            query_id: "id".to_string(),
            query_name: "name".to_string(),
            reference_id: "id".to_string(),
            reference_name: "name".to_string(),
        }
    }
}

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `NAMECASCADE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lexical algorithm weights. Must sum to 1 ± 0.01.
    pub scoring_weights: ScoringWeights,

    /// Candidates scoring below this never appear in a ranked result. Default: `60`.
    pub min_score_threshold: f64,

    /// Ranked candidates kept per query. Default: `3`.
    pub top_n_matches: usize,

    /// Queries evaluated concurrently. Default: `8`.
    pub max_workers: usize,

    /// Restrict comparisons to same-key blocks. Default: `true`.
    pub blocking_enabled: bool,

    pub cascade: CascadeConfig,
    pub judge: JudgeConfig,
    pub normalizer: NormalizerConfig,
    pub columns: ColumnConfig,

    /// JSON-lines file holding query records (binary only).
    pub query_path: Option<PathBuf>,

    /// JSON-lines file holding reference records (binary only).
    pub reference_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring_weights: ScoringWeights::default(),
            min_score_threshold: DEFAULT_MIN_SCORE_THRESHOLD,
            top_n_matches: DEFAULT_TOP_N_MATCHES,
            max_workers: DEFAULT_MAX_WORKERS,
            blocking_enabled: true,
            cascade: CascadeConfig::default(),
            judge: JudgeConfig::default(),
            normalizer: NormalizerConfig::default(),
            columns: ColumnConfig::default(),
            query_path: None,
            reference_path: None,
        }
    }
}

impl Config {
    const ENV_SCORING_WEIGHTS: &'static str = "NAMECASCADE_SCORING_WEIGHTS";
    const ENV_MIN_SCORE: &'static str = "NAMECASCADE_MIN_SCORE_THRESHOLD";
    const ENV_TOP_N: &'static str = "NAMECASCADE_TOP_N_MATCHES";
    const ENV_MAX_WORKERS: &'static str = "NAMECASCADE_MAX_WORKERS";
    const ENV_BLOCKING: &'static str = "NAMECASCADE_BLOCKING_ENABLED";
    const ENV_QUERY_ID_COLUMN: &'static str = "NAMECASCADE_QUERY_ID_COLUMN";
    const ENV_QUERY_NAME_COLUMN: &'static str = "NAMECASCADE_QUERY_NAME_COLUMN";
    const ENV_REFERENCE_ID_COLUMN: &'static str = "NAMECASCADE_REFERENCE_ID_COLUMN";
    const ENV_REFERENCE_NAME_COLUMN: &'static str = "NAMECASCADE_REFERENCE_NAME_COLUMN";
    const ENV_QUERY_PATH: &'static str = "NAMECASCADE_QUERY_PATH";
    const ENV_REFERENCE_PATH: &'static str = "NAMECASCADE_REFERENCE_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Values that are present but unparseable are errors, not silent defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();

        let scoring_weights = match env::var(Self::ENV_SCORING_WEIGHTS) {
            Ok(value) => ScoringWeights::parse(&value)?,
            Err(_) => defaults.scoring_weights,
        };

        let columns = ColumnConfig {
            query_id: parse_string_from_env(Self::ENV_QUERY_ID_COLUMN, defaults.columns.query_id),
            query_name: parse_string_from_env(
                Self::ENV_QUERY_NAME_COLUMN,
                defaults.columns.query_name,
            ),
            reference_id: parse_string_from_env(
                Self::ENV_REFERENCE_ID_COLUMN,
                defaults.columns.reference_id,
            ),
            reference_name: parse_string_from_env(
                Self::ENV_REFERENCE_NAME_COLUMN,
                defaults.columns.reference_name,
            ),
        };

        Ok(Self {
            scoring_weights,
            min_score_threshold: parse_f64_from_env(
                Self::ENV_MIN_SCORE,
                defaults.min_score_threshold,
            )?,
            top_n_matches: parse_usize_from_env(Self::ENV_TOP_N, defaults.top_n_matches)?,
            max_workers: parse_usize_from_env(Self::ENV_MAX_WORKERS, defaults.max_workers)?,
            blocking_enabled: parse_bool_from_env(Self::ENV_BLOCKING, defaults.blocking_enabled)?,
            cascade: CascadeConfig::from_env()?,
            judge: JudgeConfig::from_env()?,
            normalizer: NormalizerConfig::from_env()?,
            columns,
            query_path: parse_optional_path_from_env(Self::ENV_QUERY_PATH),
            reference_path: parse_optional_path_from_env(Self::ENV_REFERENCE_PATH),
        })
    }

    /// Validates weights, threshold ordering, judge settings and input paths.
    pub fn validate(&self) -> ConfigResult<()> {
        self.scoring_weights.validate()?;

        if !(0.0..=SCORE_SCALE).contains(&self.min_score_threshold) {
            return Err(ConfigError::InvalidThresholds {
                reason: format!(
                    "min_score_threshold must be within 0..=100, got {}",
                    self.min_score_threshold
                ),
            });
        }
        self.cascade
            .validate()
            .map_err(|reason| ConfigError::InvalidThresholds { reason })?;
        if self.min_score_threshold > self.cascade.confidence.low {
            return Err(ConfigError::InvalidThresholds {
                reason: format!(
                    "min_score_threshold ({}) must not exceed confidence.low ({})",
                    self.min_score_threshold, self.cascade.confidence.low
                ),
            });
        }

        if self.top_n_matches == 0 {
            return Err(ConfigError::ZeroValue {
                name: "top_n_matches",
            });
        }
        if self.max_workers == 0 {
            return Err(ConfigError::ZeroValue {
                name: "max_workers",
            });
        }

        self.judge
            .validate()
            .map_err(|reason| ConfigError::InvalidJudge { reason })?;

        // Surfaces recursive or malformed abbreviation entries before the run.
        Normalizer::from_config(&self.normalizer)?;

        for path in [&self.query_path, &self.reference_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }
}

pub(crate) fn parse_string_from_env(var_name: &str, default: String) -> String {
    env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

pub(crate) fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
    env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
    parse_optional_string_from_env(var_name).map(PathBuf::from)
}

pub(crate) fn parse_f64_from_env(name: &'static str, default: f64) -> ConfigResult<f64> {
    match env::var(name) {
        Ok(value) => {
            let parsed: f64 = value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidValue {
                    name,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            if !parsed.is_finite() {
                return Err(ConfigError::InvalidValue {
                    name,
                    value,
                    reason: "must be finite".to_string(),
                });
            }
            Ok(parsed)
        }
        Err(_) => Ok(default),
    }
}

pub(crate) fn parse_u64_from_env(name: &'static str, default: u64) -> ConfigResult<u64> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                name,
                value: value.clone(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

pub(crate) fn parse_usize_from_env(name: &'static str, default: usize) -> ConfigResult<usize> {
    parse_u64_from_env(name, default as u64).map(|v| v as usize)
}

pub(crate) fn parse_bool_from_env(name: &'static str, default: bool) -> ConfigResult<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name,
                value,
                reason: "expected true/false".to_string(),
            }),
        },
        Err(_) => Ok(default),
    }
}
