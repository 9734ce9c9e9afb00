//! Primary-key integrity checks.
//!
//! Row numbers reported here are display rows: data index + 2, since the
//! header occupies spreadsheet row 1.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Offset between a 0-based data index and its spreadsheet row number.
pub const DISPLAY_ROW_OFFSET: usize = 2;

/// Convert a 0-based data index to its display row number.
#[must_use]
pub fn display_row(index: usize) -> usize {
    index + DISPLAY_ROW_OFFSET
}

/// A primary-key value that occurs on more than one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateInfo {
    pub value: String,
    /// Display rows, ascending, at least two.
    pub rows: Vec<usize>,
}

/// Findings of [`validate`]. Advisory: callers decide whether to block export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub has_duplicates: bool,
    pub duplicates: Vec<DuplicateInfo>,
    #[serde(rename = "hasEmptyPKs")]
    pub has_empty_pks: bool,
    #[serde(rename = "emptyPKRows")]
    pub empty_pk_rows: Vec<usize>,
}

/// What is wrong with a single row's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RowFinding {
    Duplicate { value: String },
    EmptyPk,
}

impl ValidationResult {
    /// True when any duplicate or empty key was found.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_duplicates || self.has_empty_pks
    }

    /// Findings keyed by 0-based data index. An empty key wins over a
    /// duplicate on the same row.
    #[must_use]
    pub fn flagged_rows(&self) -> BTreeMap<usize, RowFinding> {
        let mut flagged = BTreeMap::new();
        // Rows above the first data row cannot be mapped back and are skipped
        for dup in &self.duplicates {
            for index in dup.rows.iter().filter_map(|r| r.checked_sub(DISPLAY_ROW_OFFSET)) {
                flagged.insert(
                    index,
                    RowFinding::Duplicate {
                        value: dup.value.clone(),
                    },
                );
            }
        }
        for index in self
            .empty_pk_rows
            .iter()
            .filter_map(|r| r.checked_sub(DISPLAY_ROW_OFFSET))
        {
            flagged.insert(index, RowFinding::EmptyPk);
        }
        flagged
    }
}

/// Group rows by trimmed key and report every key seen more than once.
///
/// Duplicates are listed in order of first occurrence.
pub fn check_duplicate_pks<S: AsRef<str>>(values: &[S]) -> Vec<DuplicateInfo> {
    let mut seen: IndexMap<&str, Vec<usize>> = IndexMap::new();

    for (i, value) in values.iter().enumerate() {
        seen.entry(value.as_ref().trim())
            .or_default()
            .push(display_row(i));
    }

    seen.into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(value, rows)| DuplicateInfo {
            value: value.to_string(),
            rows,
        })
        .collect()
}

/// A key is empty when, trimmed, it is `""`, `"undefined"` or `"null"`.
#[must_use]
pub fn is_empty_pk(value: &str) -> bool {
    matches!(value.trim(), "" | "undefined" | "null")
}

/// Display rows whose key is empty, ascending.
pub fn check_empty_pks<S: AsRef<str>>(values: &[S]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, value)| is_empty_pk(value.as_ref()))
        .map(|(i, _)| display_row(i))
        .collect()
}

/// Run both primary-key checks over one key per data row.
pub fn validate<S: AsRef<str>>(pk_values: &[S]) -> ValidationResult {
    let duplicates = check_duplicate_pks(pk_values);
    let empty_pk_rows = check_empty_pks(pk_values);

    tracing::debug!(
        rows = pk_values.len(),
        duplicates = duplicates.len(),
        empty = empty_pk_rows.len(),
        "validated primary keys"
    );

    ValidationResult {
        has_duplicates: !duplicates.is_empty(),
        duplicates,
        has_empty_pks: !empty_pk_rows.is_empty(),
        empty_pk_rows,
    }
}
