use std::collections::HashMap;

use super::error::NormalizeError;

/// Built-in legal/domain abbreviations. Keys are matched on token cores (see
/// [`token_core`]); multi-token keys are space separated.
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("&", "and"),
    ("assn", "association"),
    ("assoc", "association"),
    ("bros", "brothers"),
    ("cntr", "center"),
    ("co", "company"),
    ("co op", "cooperative"),
    ("co-op", "cooperative"),
    ("corp", "corporation"),
    ("ctr", "center"),
    ("dept", "department"),
    ("grp", "group"),
    ("hldgs", "holdings"),
    ("hosp", "hospital"),
    ("inc", "incorporated"),
    ("intl", "international"),
    ("llc", "limited liability company"),
    ("llp", "limited liability partnership"),
    ("ltd", "limited"),
    ("med", "medical"),
    ("med ctr", "medical center"),
    ("mfg", "manufacturing"),
    ("mgmt", "management"),
    ("mt", "mount"),
    ("natl", "national"),
    ("plc", "public limited company"),
    ("svc", "service"),
    ("svcs", "services"),
    ("univ", "university"),
];

/// Returns the alphanumeric/hyphen core of a token (`"corp."` → `"corp"`).
///
/// Tokens with no such characters (`"&"`) are returned unchanged so they can still
/// be dictionary keys.
pub fn token_core(token: &str) -> String {
    let core: String = token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect();
    if core.is_empty() {
        token.to_string()
    } else {
        core
    }
}

/// Token-sequence abbreviation dictionary with longest-match-first expansion.
#[derive(Debug, Clone)]
pub struct AbbreviationDictionary {
    entries: HashMap<Vec<String>, Vec<String>>,
    max_key_len: usize,
}

impl AbbreviationDictionary {
    /// Builds a dictionary and rejects expansions that would themselves expand.
    pub fn new<I, K, V>(pairs: I) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = HashMap::new();
        let mut max_key_len = 0;

        for (key, value) in pairs {
            let key_tokens: Vec<String> = key
                .as_ref()
                .split_whitespace()
                .map(|t| token_core(&t.to_lowercase()))
                .collect();
            if key_tokens.is_empty() {
                return Err(NormalizeError::EmptyAbbreviation);
            }
            let value_tokens: Vec<String> = value
                .as_ref()
                .split_whitespace()
                .map(|t| t.to_lowercase())
                .collect();

            max_key_len = max_key_len.max(key_tokens.len());
            entries.insert(key_tokens, value_tokens);
        }

        let dictionary = Self {
            entries,
            max_key_len,
        };
        dictionary.check_closed()?;
        Ok(dictionary)
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            max_key_len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a copy extended with `extra` entries (later entries win).
    pub fn extended<I, K, V>(&self, extra: I) -> Result<Self, NormalizeError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.join(" "), v.join(" ")))
            .collect();
        pairs.extend(
            extra
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        Self::new(pairs)
    }

    /// Expands `tokens`, preferring the longest key at each position.
    pub fn expand(&self, tokens: &[&str]) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        let cores: Vec<String> = tokens.iter().map(|t| token_core(t)).collect();

        let mut i = 0;
        while i < tokens.len() {
            let longest = self.max_key_len.min(tokens.len() - i);
            let hit = (1..=longest)
                .rev()
                .find_map(|len| self.entries.get(&cores[i..i + len]).map(|v| (len, v)));

            match hit {
                Some((len, expansion)) => {
                    out.extend(expansion.iter().cloned());
                    i += len;
                }
                None => {
                    out.push(tokens[i].to_string());
                    i += 1;
                }
            }
        }
        out
    }

    // An expansion containing a key would make normalization non-idempotent.
    fn check_closed(&self) -> Result<(), NormalizeError> {
        for (key, value) in &self.entries {
            let value_refs: Vec<&str> = value.iter().map(String::as_str).collect();
            if self.expand(&value_refs) != *value {
                return Err(NormalizeError::RecursiveExpansion {
                    key: key.join(" "),
                    expansion: value.join(" "),
                });
            }
        }
        Ok(())
    }
}

impl Default for AbbreviationDictionary {
    fn default() -> Self {
        // The built-in table is closed under expansion; covered by tests.
        Self::new(DEFAULT_ABBREVIATIONS.iter().copied()).unwrap_or_else(|_| Self::empty())
    }
}
