use std::str::FromStr;
use std::time::Duration;

use crate::config::{
    ConfigError, ConfigResult, parse_f64_from_env, parse_optional_string_from_env,
    parse_string_from_env, parse_u64_from_env, parse_usize_from_env,
};
use crate::constants::{
    DEFAULT_JUDGE_MAX_CONCURRENCY, DEFAULT_JUDGE_MAX_RETRIES, DEFAULT_JUDGE_RETRY_BACKOFF_MS,
    DEFAULT_JUDGE_TIMEOUT_MS,
};

/// Default chat model for the `genai` provider.
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";

/// Which judge implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JudgeProvider {
    /// No judge: mid-band pairs take the lexical-only decision.
    #[default]
    Disabled,
    /// JSON-over-HTTP endpoint.
    Http,
    /// Chat model through `genai`.
    Genai,
}

impl JudgeProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeProvider::Disabled => "disabled",
            JudgeProvider::Http => "http",
            JudgeProvider::Genai => "genai",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, JudgeProvider::Disabled)
    }
}

impl FromStr for JudgeProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" | "disabled" | "off" => Ok(JudgeProvider::Disabled),
            "http" => Ok(JudgeProvider::Http),
            "genai" | "llm" => Ok(JudgeProvider::Genai),
            other => Err(format!("unknown judge provider '{other}'")),
        }
    }
}

/// Settings for the semantic judge and the optional verifier.
#[derive(Clone, PartialEq)]
pub struct JudgeConfig {
    pub provider: JudgeProvider,
    /// Required for [`JudgeProvider::Http`].
    pub endpoint: Option<String>,
    /// Sent as a bearer token by the HTTP judge when set.
    pub api_key: Option<String>,
    pub model: String,

    /// `from_env` fills the verifier's endpoint and model from the primary
    /// judge's when their own variables are unset.
    pub verify_provider: JudgeProvider,
    pub verify_endpoint: Option<String>,
    pub verify_model: String,

    /// Judge calls in flight across the whole run. Default: `8`.
    pub max_concurrency: usize,
    /// Per-call timeout. Default: `10s`.
    pub timeout: Duration,
    /// Extra attempts after a transient failure. Default: `2`.
    pub max_retries: u32,
    /// Base backoff; attempt `n` waits `n * retry_backoff`. Default: `250ms`.
    pub retry_backoff: Duration,
    /// Used for the run's estimated cost. Default: `0`.
    pub cost_per_call: f64,
}

// Keeps `api_key` out of logs.
impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("verify_provider", &self.verify_provider)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            provider: JudgeProvider::Disabled,
            endpoint: None,
            api_key: None,
            model: DEFAULT_JUDGE_MODEL.to_string(),
            verify_provider: JudgeProvider::Disabled,
            verify_endpoint: None,
            verify_model: DEFAULT_JUDGE_MODEL.to_string(),
            max_concurrency: DEFAULT_JUDGE_MAX_CONCURRENCY,
            timeout: Duration::from_millis(DEFAULT_JUDGE_TIMEOUT_MS),
            max_retries: DEFAULT_JUDGE_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_JUDGE_RETRY_BACKOFF_MS),
            cost_per_call: 0.0,
        }
    }
}

impl JudgeConfig {
    const ENV_PROVIDER: &'static str = "NAMECASCADE_JUDGE_PROVIDER";
    const ENV_ENDPOINT: &'static str = "NAMECASCADE_JUDGE_ENDPOINT";
    const ENV_API_KEY: &'static str = "NAMECASCADE_JUDGE_API_KEY";
    const ENV_MODEL: &'static str = "NAMECASCADE_JUDGE_MODEL";
    const ENV_VERIFY_PROVIDER: &'static str = "NAMECASCADE_VERIFY_PROVIDER";
    const ENV_VERIFY_ENDPOINT: &'static str = "NAMECASCADE_VERIFY_ENDPOINT";
    const ENV_VERIFY_MODEL: &'static str = "NAMECASCADE_VERIFY_MODEL";
    const ENV_MAX_CONCURRENCY: &'static str = "NAMECASCADE_JUDGE_MAX_CONCURRENCY";
    const ENV_TIMEOUT_MS: &'static str = "NAMECASCADE_JUDGE_TIMEOUT_MS";
    const ENV_MAX_RETRIES: &'static str = "NAMECASCADE_JUDGE_MAX_RETRIES";
    const ENV_RETRY_BACKOFF_MS: &'static str = "NAMECASCADE_JUDGE_RETRY_BACKOFF_MS";
    const ENV_COST_PER_CALL: &'static str = "NAMECASCADE_JUDGE_COST_PER_CALL";

    pub fn from_env() -> ConfigResult<Self> {
        let defaults = Self::default();

        let max_retries = parse_u64_from_env(Self::ENV_MAX_RETRIES, defaults.max_retries as u64)?;
        let max_retries = u32::try_from(max_retries).map_err(|_| ConfigError::InvalidValue {
            name: Self::ENV_MAX_RETRIES,
            value: max_retries.to_string(),
            reason: "too large".to_string(),
        })?;

        let endpoint = parse_optional_string_from_env(Self::ENV_ENDPOINT);
        let model = parse_string_from_env(Self::ENV_MODEL, defaults.model);

        Ok(Self {
            provider: Self::parse_provider(Self::ENV_PROVIDER)?,
            verify_provider: Self::parse_provider(Self::ENV_VERIFY_PROVIDER)?,
            verify_endpoint: parse_optional_string_from_env(Self::ENV_VERIFY_ENDPOINT)
                .or_else(|| endpoint.clone()),
            verify_model: parse_string_from_env(Self::ENV_VERIFY_MODEL, model.clone()),
            endpoint,
            api_key: parse_optional_string_from_env(Self::ENV_API_KEY),
            model,
            max_concurrency: parse_usize_from_env(
                Self::ENV_MAX_CONCURRENCY,
                defaults.max_concurrency,
            )?,
            timeout: Duration::from_millis(parse_u64_from_env(
                Self::ENV_TIMEOUT_MS,
                defaults.timeout.as_millis() as u64,
            )?),
            max_retries,
            retry_backoff: Duration::from_millis(parse_u64_from_env(
                Self::ENV_RETRY_BACKOFF_MS,
                defaults.retry_backoff.as_millis() as u64,
            )?),
            cost_per_call: parse_f64_from_env(Self::ENV_COST_PER_CALL, defaults.cost_per_call)?,
        })
    }

    fn parse_provider(name: &'static str) -> ConfigResult<JudgeProvider> {
        match parse_optional_string_from_env(name) {
            Some(value) => value
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    name,
                    value,
                    reason,
                }),
            None => Ok(JudgeProvider::Disabled),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be at least 1".to_string());
        }
        if self.timeout.is_zero() {
            return Err("judge timeout must be greater than zero".to_string());
        }
        if !self.cost_per_call.is_finite() || self.cost_per_call < 0.0 {
            return Err(format!(
                "cost_per_call must be a non-negative number, got {}",
                self.cost_per_call
            ));
        }
        if self.provider == JudgeProvider::Http && self.endpoint.is_none() {
            return Err("http judge requires an endpoint".to_string());
        }
        if self.verify_provider == JudgeProvider::Http && self.verify_endpoint.is_none() {
            return Err("http verifier requires an endpoint".to_string());
        }
        if self.verify_provider.is_enabled() && !self.provider.is_enabled() {
            return Err("a verifier requires a primary judge".to_string());
        }
        if self.provider == JudgeProvider::Genai && self.model.trim().is_empty() {
            return Err("genai judge requires a model".to_string());
        }
        Ok(())
    }
}
