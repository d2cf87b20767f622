//! Flat table output: one row per query, `k` column groups per rank.
//!
//! Columns are `query_id`, then `candidate_id_rank_k`, `score_rank_k` and
//! `confidence_rank_k` for `k = 1..=top_n`. Slots past the ranked candidates are null.

use serde_json::{Map, Value};

use super::types::MatchResult;
use crate::cascade::ConfidenceLabel;
use crate::constants::NO_MATCH_ID;
use crate::dataset::InputError;

#[derive(Debug, Clone, PartialEq)]
pub struct FlatRank {
    /// [`NO_MATCH_ID`] for the synthetic candidate.
    pub candidate_id: String,
    /// Rounded to two decimals.
    pub score: f64,
    pub confidence: ConfidenceLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    pub query_id: String,
    pub ranks: Vec<FlatRank>,
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

fn invalid(reason: impl Into<String>) -> InputError {
    InputError::InvalidFlatRow {
        reason: reason.into(),
    }
}

impl FlatRow {
    pub fn from_result(result: &MatchResult) -> Self {
        let ranks = result
            .ranked_candidates()
            .iter()
            .map(|c| FlatRank {
                candidate_id: c.candidate_id().unwrap_or(NO_MATCH_ID).to_string(),
                score: round2(c.final_score),
                confidence: c.confidence_label,
            })
            .collect();
        Self {
            query_id: result.query_id().to_string(),
            ranks,
        }
    }

    /// JSON object with `top_n` column groups.
    pub fn to_value(&self, top_n: usize) -> Value {
        let mut row = Map::new();
        row.insert("query_id".to_string(), Value::String(self.query_id.clone()));

        for k in 1..=top_n.max(1) {
            let (id, score, confidence) = match self.ranks.get(k - 1) {
                Some(rank) => (
                    Value::String(rank.candidate_id.clone()),
                    serde_json::Number::from_f64(rank.score).map_or(Value::Null, Value::Number),
                    Value::String(rank.confidence.as_str().to_string()),
                ),
                None => (Value::Null, Value::Null, Value::Null),
            };
            row.insert(format!("candidate_id_rank_{k}"), id);
            row.insert(format!("score_rank_{k}"), score);
            row.insert(format!("confidence_rank_{k}"), confidence);
        }

        Value::Object(row)
    }

    /// Re-parses a row written by [`FlatRow::to_value`]. Reading stops at the
    /// first empty rank slot.
    pub fn from_value(value: &Value) -> Result<Self, InputError> {
        let row = value
            .as_object()
            .ok_or_else(|| invalid("flat row is not a JSON object"))?;

        let query_id = match row.get("query_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(invalid("missing query_id")),
        };

        let mut ranks = Vec::new();
        for k in 1.. {
            let candidate_id = match row.get(&format!("candidate_id_rank_{k}")) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => break,
                Some(other) => {
                    return Err(invalid(format!(
                        "candidate_id_rank_{k} is not a string: {other}"
                    )));
                }
            };
            let score = row
                .get(&format!("score_rank_{k}"))
                .and_then(Value::as_f64)
                .ok_or_else(|| invalid(format!("score_rank_{k} missing or not a number")))?;
            let confidence = row
                .get(&format!("confidence_rank_{k}"))
                .and_then(Value::as_str)
                .ok_or_else(|| invalid(format!("confidence_rank_{k} missing")))?
                .parse::<ConfidenceLabel>()
                .map_err(invalid)?;

            ranks.push(FlatRank {
                candidate_id,
                score,
                confidence,
            });
        }

        Ok(Self { query_id, ranks })
    }

    pub fn to_json_string(&self, top_n: usize) -> String {
        self.to_value(top_n).to_string()
    }

    pub fn from_json_str(line: &str) -> Result<Self, InputError> {
        let value: Value = serde_json::from_str(line).map_err(|e| invalid(e.to_string()))?;
        Self::from_value(&value)
    }
}

impl MatchResult {
    pub fn to_flat_row(&self) -> FlatRow {
        FlatRow::from_result(self)
    }
}
