//! Single-key VLOOKUP join between a lookup sheet and a reference sheet.
//!
//! Keys are compared as trimmed strings. The first reference row carrying a
//! key wins; later rows with the same key are counted but never returned.
//! A lookup row with an empty key is reported as unmatched.
//!
//! Key columns left unchosen are picked by header name: headers match when
//! they are equal after trimming and lowercasing, and blank headers never
//! match.

use crate::validate::display_row;
use serde::{Deserialize, Serialize};
use sheetql_sheet::{column_index_to_letter, CellValue, Sheet};
use std::collections::HashMap;

/// One column copied from the reference sheet into the target sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlookupMapping {
    /// Column read from the matched reference row.
    pub return_col: usize,
    /// Column written in the target sheet.
    pub target_col: usize,
    /// Header override for the target column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
}

impl VlookupMapping {
    #[must_use]
    pub fn new(return_col: usize, target_col: usize) -> Self {
        Self {
            return_col,
            target_col,
            column_name: None,
        }
    }

    /// Set the header override.
    #[must_use]
    pub fn with_column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }
}

/// Outcome for one lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlookupResult {
    /// 0-based lookup row index.
    pub row: usize,
    pub matched: bool,
    /// One value per mapping; empty strings when unmatched.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VlookupOutput {
    pub results: Vec<VlookupResult>,
    pub match_count: usize,
    pub no_match_count: usize,
    pub duplicate_keys_in_reference: usize,
}

impl VlookupOutput {
    /// Display row numbers of lookup rows that found no match.
    #[must_use]
    pub fn unmatched_rows(&self) -> Vec<usize> {
        self.results
            .iter()
            .filter(|r| !r.matched)
            .map(|r| display_row(r.row))
            .collect()
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Index of the first header in `headers` matching `header`.
pub fn matching_column<S: AsRef<str>>(header: &str, headers: &[S]) -> Option<usize> {
    let wanted = normalize_header(header);
    if wanted.is_empty() {
        return None;
    }
    headers
        .iter()
        .position(|h| normalize_header(h.as_ref()) == wanted)
}

/// For each header, whether it also names a column of `other`.
#[must_use]
pub fn matchable_columns<S: AsRef<str>, T: AsRef<str>>(headers: &[S], other: &[T]) -> Vec<bool> {
    headers
        .iter()
        .map(|h| matching_column(h.as_ref(), other).is_some())
        .collect()
}

/// The first lookup column, in order, whose header names a reference column.
pub fn detect_key_columns<S: AsRef<str>, T: AsRef<str>>(
    lookup_headers: &[S],
    reference_headers: &[T],
) -> Option<(usize, usize)> {
    lookup_headers.iter().enumerate().find_map(|(li, h)| {
        matching_column(h.as_ref(), reference_headers).map(|ri| (li, ri))
    })
}

/// Settle the `(lookup, match)` key columns from whatever the caller chose.
///
/// Both chosen: used as given. One chosen: the other side is the column with
/// the same header, else the detected pair's. Neither: the detected pair,
/// falling back to the first column on both sides.
pub fn resolve_key_columns<S: AsRef<str>, T: AsRef<str>>(
    lookup_headers: &[S],
    reference_headers: &[T],
    lookup_col: Option<usize>,
    match_col: Option<usize>,
) -> (usize, usize) {
    let detected = detect_key_columns(lookup_headers, reference_headers).unwrap_or((0, 0));
    match (lookup_col, match_col) {
        (Some(l), Some(m)) => (l, m),
        (Some(l), None) => {
            let m = lookup_headers
                .get(l)
                .and_then(|h| matching_column(h.as_ref(), reference_headers))
                .unwrap_or(detected.1);
            (l, m)
        }
        (None, Some(m)) => {
            let l = reference_headers
                .get(m)
                .and_then(|h| matching_column(h.as_ref(), lookup_headers))
                .unwrap_or(detected.0);
            (l, m)
        }
        (None, None) => detected,
    }
}

fn key_of(row: &[CellValue], col: usize) -> String {
    row.get(col).map(CellValue::as_key).unwrap_or_default()
}

/// Join `lookup_rows` against `reference_rows`.
///
/// Runs in O(n + m): the reference sheet is indexed once, then each lookup
/// row is resolved with a hash lookup. Inputs are not modified.
pub fn perform_vlookup(
    lookup_rows: &[Vec<CellValue>],
    lookup_col: usize,
    reference_rows: &[Vec<CellValue>],
    match_col: usize,
    mappings: &[VlookupMapping],
) -> VlookupOutput {
    let mut index: HashMap<String, &[CellValue]> = HashMap::with_capacity(reference_rows.len());
    let mut duplicate_keys_in_reference = 0;

    for row in reference_rows {
        let key = key_of(row, match_col);
        if key.is_empty() {
            continue;
        }
        if index.contains_key(&key) {
            duplicate_keys_in_reference += 1;
        } else {
            index.insert(key, row.as_slice());
        }
    }

    if duplicate_keys_in_reference > 0 {
        tracing::warn!(
            duplicates = duplicate_keys_in_reference,
            "reference sheet has repeated keys; the first occurrence is used"
        );
    }

    let mut match_count = 0;
    let mut no_match_count = 0;
    let mut results = Vec::with_capacity(lookup_rows.len());

    for (i, row) in lookup_rows.iter().enumerate() {
        let key = key_of(row, lookup_col);
        let found = if key.is_empty() { None } else { index.get(&key) };

        match found {
            Some(reference) => {
                match_count += 1;
                let values = mappings
                    .iter()
                    .map(|m| {
                        reference
                            .get(m.return_col)
                            .map(CellValue::as_str)
                            .unwrap_or_default()
                    })
                    .collect();
                results.push(VlookupResult {
                    row: i,
                    matched: true,
                    values,
                });
            }
            None => {
                no_match_count += 1;
                results.push(VlookupResult {
                    row: i,
                    matched: false,
                    values: vec![String::new(); mappings.len()],
                });
            }
        }
    }

    tracing::debug!(
        lookup_rows = lookup_rows.len(),
        reference_rows = reference_rows.len(),
        match_count,
        no_match_count,
        "vlookup complete"
    );

    VlookupOutput {
        results,
        match_count,
        no_match_count,
        duplicate_keys_in_reference,
    }
}

/// Write join results into a copy of `target`.
///
/// Result row `r.row` lands on data row `r.row` of the target; rows and cells
/// are added as needed. Headers grow to cover every target column, new ones
/// named `Column <LETTER>`, and a non-blank mapping `column_name` replaces the
/// header of its target column.
#[must_use]
pub fn apply_results(target: &Sheet, mappings: &[VlookupMapping], output: &VlookupOutput) -> Sheet {
    let mut sheet = target.clone();

    for result in &output.results {
        for (mapping, value) in mappings.iter().zip(&result.values) {
            sheet.set_cell(result.row, mapping.target_col, value.as_str());
        }
    }

    let needed = mappings
        .iter()
        .map(|m| m.target_col + 1)
        .max()
        .unwrap_or(0);
    let headers = sheet.headers_mut();
    while headers.len() < needed {
        headers.push(format!("Column {}", column_index_to_letter(headers.len())));
    }
    for mapping in mappings {
        if let Some(name) = &mapping.column_name {
            let name = name.trim();
            if !name.is_empty() {
                headers[mapping.target_col] = name.to_string();
            }
        }
    }

    sheet
}
