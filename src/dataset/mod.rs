//! Tabular input intake.
//!
//! A [`Dataset`] is a list of `(id, name)` rows pulled out of a wider table by
//! configured column names. Missing or non-string name cells become empty names;
//! a missing column, a missing id or the reserved [`NO_MATCH_ID`] is fatal for
//! the dataset.

pub mod error;


pub use error::{InputError, InputResult};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::constants::NO_MATCH_ID;
use crate::normalize::{NormalizationCache, Normalizer};
use crate::record::NameRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub id: String,
    /// `None` when the cell was missing or not a string.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    label: String,
    rows: Vec<InputRow>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, rows: Vec<InputRow>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }

    /// Trusted in-memory rows; ids are not checked against [`NO_MATCH_ID`].
    pub fn from_pairs<I, K, V>(label: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = pairs
            .into_iter()
            .map(|(id, name)| InputRow {
                id: id.into(),
                name: Some(name.into()),
            })
            .collect();
        Self::new(label, rows)
    }

    /// Builds a dataset from a header and rows of optional cells. Short rows
    /// are padded with missing cells.
    pub fn from_table<S: AsRef<str>>(
        label: impl Into<String>,
        columns: &[S],
        rows: Vec<Vec<Option<String>>>,
        id_column: &str,
        name_column: &str,
    ) -> InputResult<Self> {
        let label = label.into();
        let position = |column: &str| {
            columns
                .iter()
                .position(|c| c.as_ref() == column)
                .ok_or_else(|| InputError::MissingColumn {
                    dataset: label.clone(),
                    column: column.to_string(),
                })
        };
        let id_idx = position(id_column)?;
        let name_idx = position(name_column)?;

        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut cells)| {
                let take = |cells: &mut Vec<Option<String>>, idx: usize| {
                    cells.get_mut(idx).and_then(Option::take)
                };
                let id = take(&mut cells, id_idx)
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| InputError::MissingId {
                        dataset: label.clone(),
                        row: i + 1,
                    })?;
                let id = unreserved(&label, i + 1, id)?;
                let name = take(&mut cells, name_idx);
                Ok(InputRow { id, name })
            })
            .collect::<InputResult<Vec<_>>>()?;

        Ok(Self { label, rows })
    }

    /// Reads one JSON object per line. Blank lines are skipped. The first
    /// record acts as the header: both columns must be present there.
    pub fn from_json_lines<R: BufRead>(
        label: impl Into<String>,
        reader: R,
        id_column: &str,
        name_column: &str,
    ) -> InputResult<Self> {
        let label = label.into();
        let mut rows = Vec::new();
        let mut header_checked = false;

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|source| InputError::Io {
                dataset: label.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let value: Value =
                serde_json::from_str(&line).map_err(|source| InputError::InvalidJson {
                    dataset: label.clone(),
                    line: line_no,
                    source,
                })?;
            let Value::Object(record) = value else {
                return Err(InputError::NotAnObject {
                    dataset: label.clone(),
                    line: line_no,
                });
            };

            if !header_checked {
                for column in [id_column, name_column] {
                    if !record.contains_key(column) {
                        return Err(InputError::MissingColumn {
                            dataset: label.clone(),
                            column: column.to_string(),
                        });
                    }
                }
                header_checked = true;
            }

            let id = match record.get(id_column) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    return Err(InputError::MissingId {
                        dataset: label.clone(),
                        row: line_no,
                    });
                }
            };
            let id = unreserved(&label, line_no, id)?;
            let name = match record.get(name_column) {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            };
            rows.push(InputRow { id, name });
        }

        debug!(dataset = %label, rows = rows.len(), "Loaded JSON-lines dataset");
        Ok(Self { label, rows })
    }

    pub fn from_json_lines_path(
        label: impl Into<String>,
        path: &Path,
        id_column: &str,
        name_column: &str,
    ) -> InputResult<Self> {
        let file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_lines(label, BufReader::new(file), id_column, name_column)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rows(&self) -> &[InputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Normalizes every row into a shared [`NameRecord`], in input order.
    pub fn to_records(
        &self,
        normalizer: &Normalizer,
        cache: &NormalizationCache,
    ) -> Vec<Arc<NameRecord>> {
        self.rows
            .iter()
            .map(|row| {
                Arc::new(NameRecord::with_cache(
                    row.id.clone(),
                    row.name.clone().unwrap_or_default(),
                    normalizer,
                    cache,
                ))
            })
            .collect()
    }
}

fn unreserved(dataset: &str, row: usize, id: String) -> InputResult<String> {
    if id == NO_MATCH_ID {
        return Err(InputError::ReservedId {
            dataset: dataset.to_string(),
            row,
            id,
        });
    }
    Ok(id)
}
