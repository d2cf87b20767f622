use std::env;

use super::error::NormalizeError;

/// Stop-words removed by default (exact token match, after expansion).
pub const DEFAULT_STOP_WORDS: &[&str] = &["the", "of", "and"];

#[derive(Debug, Clone, PartialEq)]
/// Normalizer configuration: stop-words and dictionary additions.
pub struct NormalizerConfig {
    /// Tokens removed after abbreviation expansion.
    pub stop_words: Vec<String>,
    /// Extra `(key, expansion)` pairs layered over the built-in dictionary.
    pub extra_abbreviations: Vec<(String, String)>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            extra_abbreviations: Vec::new(),
        }
    }
}

impl NormalizerConfig {
    const ENV_STOP_WORDS: &'static str = "NAMECASCADE_STOP_WORDS";
    const ENV_ABBREVIATIONS: &'static str = "NAMECASCADE_ABBREVIATIONS";

    /// Reads `NAMECASCADE_STOP_WORDS` (comma separated) and
    /// `NAMECASCADE_ABBREVIATIONS` (`key=expansion;key=expansion`).
    pub fn from_env() -> Result<Self, NormalizeError> {
        let defaults = Self::default();

        let stop_words = env::var(Self::ENV_STOP_WORDS)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.stop_words);

        let extra_abbreviations = match env::var(Self::ENV_ABBREVIATIONS) {
            Ok(value) => parse_abbreviations(&value)?,
            Err(_) => defaults.extra_abbreviations,
        };

        Ok(Self {
            stop_words,
            extra_abbreviations,
        })
    }
}

/// Parses `key=expansion;key=expansion` into pairs.
pub fn parse_abbreviations(value: &str) -> Result<Vec<(String, String)>, NormalizeError> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (key, expansion) =
                entry
                    .split_once('=')
                    .ok_or_else(|| NormalizeError::MalformedEntry {
                        entry: entry.to_string(),
                    })?;
            let (key, expansion) = (key.trim(), expansion.trim());
            if key.is_empty() || expansion.is_empty() {
                return Err(NormalizeError::MalformedEntry {
                    entry: entry.to_string(),
                });
            }
            Ok((key.to_string(), expansion.to_string()))
        })
        .collect()
}
