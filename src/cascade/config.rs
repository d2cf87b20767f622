use std::env;

use crate::config::{ConfigError, parse_f64_from_env};
use crate::constants::{
    DEFAULT_BLEND_LEXICAL, DEFAULT_BLEND_SEMANTIC, DEFAULT_BLEND_VERIFY,
    DEFAULT_CONFIDENCE_HIGH, DEFAULT_CONFIDENCE_LOW, DEFAULT_CONFIDENCE_MEDIUM,
    DEFAULT_FAST_ACCEPT_THRESHOLD, DEFAULT_FAST_REJECT_THRESHOLD, DEFAULT_FINAL_ACCEPT_THRESHOLD,
    DEFAULT_SEMANTIC_REJECT_THRESHOLD, DEFAULT_TIER1_ACCEPT_FLOOR,
    DEFAULT_TIER1_ACCEPT_THRESHOLD, SCORE_SCALE, WEIGHT_SUM_SLACK, WEIGHT_SUM_TOLERANCE,
};

use super::types::ConfidenceLabel;

/// Score bands for [`ConfidenceLabel`]. Must satisfy `low <= medium <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_CONFIDENCE_HIGH,
            medium: DEFAULT_CONFIDENCE_MEDIUM,
            low: DEFAULT_CONFIDENCE_LOW,
        }
    }
}

impl ConfidenceThresholds {
    pub fn label(&self, score: f64) -> ConfidenceLabel {
        if score >= self.high {
            ConfidenceLabel::High
        } else if score >= self.medium {
            ConfidenceLabel::Medium
        } else if score >= self.low {
            ConfidenceLabel::Low
        } else {
            ConfidenceLabel::None
        }
    }
}

/// Blend weights per tier. `verify` is only used when a verifier ran.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierBlendWeights {
    pub lexical: f64,
    pub semantic: f64,
    pub verify: f64,
}

impl Default for TierBlendWeights {
    fn default() -> Self {
        Self {
            lexical: DEFAULT_BLEND_LEXICAL,
            semantic: DEFAULT_BLEND_SEMANTIC,
            verify: DEFAULT_BLEND_VERIFY,
        }
    }
}

impl TierBlendWeights {
    /// Parses `lexical=0.3,semantic=0.4,verify=0.3`. Omitted keys keep their default.
    pub fn parse(value: &str) -> Result<Self, String> {
        let mut weights = Self::default();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, raw) = entry
                .split_once('=')
                .ok_or_else(|| format!("expected tier=weight, got '{entry}'"))?;
            let weight: f64 = raw
                .trim()
                .parse()
                .map_err(|_| format!("weight for '{}' is not a number: '{}'", key.trim(), raw.trim()))?;
            match key.trim().to_lowercase().as_str() {
                "lexical" => weights.lexical = weight,
                "semantic" => weights.semantic = weight,
                "verify" => weights.verify = weight,
                other => return Err(format!("unknown tier '{other}'")),
            }
        }
        Ok(weights)
    }

    /// `lexical·w_lex + semantic·w_sem`, plus `verify·w_verify` once the
    /// verifier has scored. Weights are not renormalized.
    pub fn blend(&self, lexical: f64, semantic: f64, verify: Option<f64>) -> f64 {
        let verified = verify.map_or(0.0, |score| self.verify * score);
        (self.lexical * lexical + self.semantic * semantic + verified).clamp(0.0, SCORE_SCALE)
    }

    fn validate(&self) -> Result<(), String> {
        for (name, w) in [
            ("lexical", self.lexical),
            ("semantic", self.semantic),
            ("verify", self.verify),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("blend weight '{name}' must be a non-negative number, got {w}"));
            }
        }
        if self.lexical + self.semantic <= 0.0 {
            return Err("lexical and semantic blend weights cannot both be zero".to_string());
        }
        let sum = self.lexical + self.semantic + self.verify;
        if sum > 1.0 + WEIGHT_SUM_TOLERANCE + WEIGHT_SUM_SLACK {
            return Err(format!("blend weights sum to {sum:.3}, must not exceed 1"));
        }
        Ok(())
    }
}

/// Thresholds that drive [`DecisionCascade`](super::DecisionCascade) transitions.
///
/// All values are on the 0–100 score scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeConfig {
    /// Lexical composite at or above this accepts without a judge call. Default: `90`.
    pub fast_accept_threshold: f64,
    /// Lexical composite below this rejects without a judge call. Default: `50`.
    pub fast_reject_threshold: f64,
    /// Blended score at or above this accepts after escalation. Default: `75`.
    pub final_accept_threshold: f64,
    /// Lexical bar that accepts a pair on its own when the judge is unavailable. Default: `85`.
    pub tier1_accept_threshold: f64,
    /// Floor applied to the final score of pairs that cleared the tier-1 bar. Default: `85`.
    pub tier1_accept_floor: f64,
    /// Semantic score below this is an explicit rejection. Default: `20`.
    pub semantic_reject_threshold: f64,
    pub confidence: ConfidenceThresholds,
    pub blend: TierBlendWeights,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            fast_accept_threshold: DEFAULT_FAST_ACCEPT_THRESHOLD,
            fast_reject_threshold: DEFAULT_FAST_REJECT_THRESHOLD,
            final_accept_threshold: DEFAULT_FINAL_ACCEPT_THRESHOLD,
            tier1_accept_threshold: DEFAULT_TIER1_ACCEPT_THRESHOLD,
            tier1_accept_floor: DEFAULT_TIER1_ACCEPT_FLOOR,
            semantic_reject_threshold: DEFAULT_SEMANTIC_REJECT_THRESHOLD,
            confidence: ConfidenceThresholds::default(),
            blend: TierBlendWeights::default(),
        }
    }
}

impl CascadeConfig {
    const ENV_FAST_ACCEPT: &'static str = "NAMECASCADE_FAST_ACCEPT_THRESHOLD";
    const ENV_FAST_REJECT: &'static str = "NAMECASCADE_FAST_REJECT_THRESHOLD";
    const ENV_FINAL_ACCEPT: &'static str = "NAMECASCADE_FINAL_ACCEPT_THRESHOLD";
    const ENV_TIER1_ACCEPT: &'static str = "NAMECASCADE_TIER1_ACCEPT_THRESHOLD";
    const ENV_TIER1_FLOOR: &'static str = "NAMECASCADE_TIER1_ACCEPT_FLOOR";
    const ENV_SEMANTIC_REJECT: &'static str = "NAMECASCADE_SEMANTIC_REJECT_THRESHOLD";
    const ENV_CONFIDENCE_HIGH: &'static str = "NAMECASCADE_CONFIDENCE_HIGH";
    const ENV_CONFIDENCE_MEDIUM: &'static str = "NAMECASCADE_CONFIDENCE_MEDIUM";
    const ENV_CONFIDENCE_LOW: &'static str = "NAMECASCADE_CONFIDENCE_LOW";
    const ENV_BLEND_WEIGHTS: &'static str = "NAMECASCADE_BLEND_WEIGHTS";

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let blend = match env::var(Self::ENV_BLEND_WEIGHTS) {
            Ok(value) => {
                TierBlendWeights::parse(&value).map_err(|reason| ConfigError::InvalidValue {
                    name: Self::ENV_BLEND_WEIGHTS,
                    value,
                    reason,
                })?
            }
            Err(_) => defaults.blend,
        };

        Ok(Self {
            fast_accept_threshold: parse_f64_from_env(
                Self::ENV_FAST_ACCEPT,
                defaults.fast_accept_threshold,
            )?,
            fast_reject_threshold: parse_f64_from_env(
                Self::ENV_FAST_REJECT,
                defaults.fast_reject_threshold,
            )?,
            final_accept_threshold: parse_f64_from_env(
                Self::ENV_FINAL_ACCEPT,
                defaults.final_accept_threshold,
            )?,
            tier1_accept_threshold: parse_f64_from_env(
                Self::ENV_TIER1_ACCEPT,
                defaults.tier1_accept_threshold,
            )?,
            tier1_accept_floor: parse_f64_from_env(
                Self::ENV_TIER1_FLOOR,
                defaults.tier1_accept_floor,
            )?,
            semantic_reject_threshold: parse_f64_from_env(
                Self::ENV_SEMANTIC_REJECT,
                defaults.semantic_reject_threshold,
            )?,
            confidence: ConfidenceThresholds {
                high: parse_f64_from_env(Self::ENV_CONFIDENCE_HIGH, defaults.confidence.high)?,
                medium: parse_f64_from_env(
                    Self::ENV_CONFIDENCE_MEDIUM,
                    defaults.confidence.medium,
                )?,
                low: parse_f64_from_env(Self::ENV_CONFIDENCE_LOW, defaults.confidence.low)?,
            },
            blend,
        })
    }

    /// Checks ranges and ordering: `reject < accept`, the final and tier-1
    /// bars sit between them, the floor is not below the tier-1 bar, and
    /// confidence bands ascend.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("fast_accept_threshold", self.fast_accept_threshold),
            ("fast_reject_threshold", self.fast_reject_threshold),
            ("final_accept_threshold", self.final_accept_threshold),
            ("tier1_accept_threshold", self.tier1_accept_threshold),
            ("tier1_accept_floor", self.tier1_accept_floor),
            ("semantic_reject_threshold", self.semantic_reject_threshold),
            ("confidence.high", self.confidence.high),
            ("confidence.medium", self.confidence.medium),
            ("confidence.low", self.confidence.low),
        ] {
            if !(0.0..=SCORE_SCALE).contains(&value) {
                return Err(format!("{name} must be within 0..=100, got {value}"));
            }
        }

        if self.fast_reject_threshold >= self.fast_accept_threshold {
            return Err(format!(
                "fast_reject_threshold ({}) must be below fast_accept_threshold ({})",
                self.fast_reject_threshold, self.fast_accept_threshold
            ));
        }
        if self.tier1_accept_threshold < self.fast_reject_threshold
            || self.tier1_accept_threshold > self.fast_accept_threshold
        {
            return Err(format!(
                "tier1_accept_threshold ({}) must lie between fast_reject_threshold and fast_accept_threshold",
                self.tier1_accept_threshold
            ));
        }
        if self.final_accept_threshold < self.fast_reject_threshold
            || self.final_accept_threshold > self.fast_accept_threshold
        {
            return Err(format!(
                "final_accept_threshold ({}) must lie between fast_reject_threshold and fast_accept_threshold",
                self.final_accept_threshold
            ));
        }
        if self.tier1_accept_floor < self.tier1_accept_threshold {
            return Err(format!(
                "tier1_accept_floor ({}) must not be below tier1_accept_threshold ({})",
                self.tier1_accept_floor, self.tier1_accept_threshold
            ));
        }
        if self.confidence.low > self.confidence.medium
            || self.confidence.medium > self.confidence.high
        {
            return Err(format!(
                "confidence thresholds must ascend low <= medium <= high, got {}/{}/{}",
                self.confidence.low, self.confidence.medium, self.confidence.high
            ));
        }

        self.blend.validate()
    }
}
