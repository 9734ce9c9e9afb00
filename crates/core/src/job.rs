//! End-to-end jobs over parsed sheets.
//!
//! These tie the building blocks together the way an interactive caller
//! uses them: check the configuration against the sheet, derive the primary
//! keys, validate them, then generate statements or join results. Nothing
//! here holds state between calls.

use crate::config::{InsertConfig, UpdateConfig};
use crate::error::{JobError, JobResult};
use crate::ids::{generate_ids, validate_id_config};
use crate::sql::{generate_insert_sql, generate_update_sql, render_script};
use crate::validate::{validate, ValidationResult};
use crate::vlookup::{
    apply_results, perform_vlookup, resolve_key_columns, VlookupMapping, VlookupOutput,
};
use serde::{Deserialize, Serialize};
use sheetql_sheet::{Book, Sheet};

/// Statements plus the key validation that gates their export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlJobOutput {
    pub statements: Vec<String>,
    pub validation: ValidationResult,
    /// IDs assigned to data rows, when the PK column was generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_ids: Option<Vec<String>>,
}

impl SqlJobOutput {
    /// The statements as one script, newline separated.
    #[must_use]
    pub fn script(&self) -> String {
        render_script(&self.statements)
    }

    /// Export is allowed only when no duplicate or empty key was found.
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        !self.validation.has_errors()
    }
}

fn check_column(sheet: &Sheet, column: usize) -> JobResult<()> {
    if column >= sheet.col_count() {
        return Err(JobError::column_out_of_range(
            sheet.name(),
            column,
            sheet.col_count(),
        ));
    }
    Ok(())
}

fn check_common(sheet: &Sheet, table_name: &str, pk_column: usize) -> JobResult<()> {
    if sheet.is_empty() {
        return Err(JobError::EmptySheet {
            sheet: sheet.name().to_string(),
        });
    }
    if table_name.trim().is_empty() {
        return Err(JobError::EmptyTableName);
    }
    check_column(sheet, pk_column)
}

impl InsertConfig {
    /// Whether this configuration can run against `sheet`.
    pub fn check(&self, sheet: &Sheet) -> JobResult<()> {
        check_common(sheet, &self.table_name, self.pk_column)
    }
}

impl UpdateConfig {
    /// Whether this configuration can run against `sheet`.
    pub fn check(&self, sheet: &Sheet) -> JobResult<()> {
        check_common(sheet, &self.table_name, self.pk_column)?;
        if self.set_columns.is_empty() {
            return Err(JobError::NoSetColumns);
        }
        for &col in &self.set_columns {
            check_column(sheet, col)?;
        }
        Ok(())
    }
}

/// Generate INSERT statements for every data row of `sheet`.
///
/// In generate mode the PK column is replaced by sequential IDs and those
/// IDs are what gets validated; otherwise the sheet's own PK column is.
pub fn run_insert(config: &InsertConfig, sheet: &Sheet) -> JobResult<SqlJobOutput> {
    config.check(sheet)?;
    let count = sheet.row_count();

    let (generated_ids, validation) = if config.generates_ids() {
        validate_id_config(
            &config.id_prefix,
            config.id_total_length,
            config.id_start_number,
            count,
        )?;
        let ids = generate_ids(
            &config.id_prefix,
            config.id_total_length,
            config.id_start_number,
            count,
        )?;
        let validation = validate(&ids);
        (Some(ids), validation)
    } else {
        (None, validate(&sheet.column_keys(config.pk_column)))
    };

    let statements = generate_insert_sql(
        config,
        sheet.headers(),
        sheet.data(),
        generated_ids.as_deref(),
    );

    tracing::info!(
        sheet = sheet.name(),
        table = %config.table_name,
        statements = statements.len(),
        exportable = !validation.has_errors(),
        "insert job finished"
    );

    Ok(SqlJobOutput {
        statements,
        validation,
        generated_ids,
    })
}

/// Generate UPDATE statements for every data row of `sheet`.
pub fn run_update(config: &UpdateConfig, sheet: &Sheet) -> JobResult<SqlJobOutput> {
    config.check(sheet)?;

    let validation = validate(&sheet.column_keys(config.pk_column));
    let effective = UpdateConfig {
        set_columns: config.effective_set_columns(),
        ..config.clone()
    };
    let statements = generate_update_sql(&effective, sheet.headers(), sheet.data());

    tracing::info!(
        sheet = sheet.name(),
        table = %config.table_name,
        statements = statements.len(),
        exportable = !validation.has_errors(),
        "update job finished"
    );

    Ok(SqlJobOutput {
        statements,
        validation,
        generated_ids: None,
    })
}

/// A copy of `sheet` whose PK column holds the generated IDs, row by row.
#[must_use]
pub fn with_generated_ids(sheet: &Sheet, pk_column: usize, ids: &[String]) -> Sheet {
    let mut result = sheet.clone();
    for (row, id) in ids.iter().enumerate().take(sheet.row_count()) {
        result.set_cell(row, pk_column, id.as_str());
    }
    result
}

/// Which sheets and columns a VLOOKUP joins, by sheet name.
///
/// Unset key columns are chosen from the sheets' headers when the job runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VlookupJob {
    pub lookup_sheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_column: Option<usize>,
    pub reference_sheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_column: Option<usize>,
    pub target_sheet: String,
    pub return_mappings: Vec<MappingEntry>,
}

/// A mapping as entered by a user; either side may still be unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingEntry {
    pub return_col: Option<usize>,
    pub target_col: Option<usize>,
    pub column_name: Option<String>,
}

impl MappingEntry {
    /// The mapping, once both columns are chosen.
    #[must_use]
    pub fn complete(&self) -> Option<VlookupMapping> {
        Some(VlookupMapping {
            return_col: self.return_col?,
            target_col: self.target_col?,
            column_name: self.column_name.clone(),
        })
    }
}

impl From<VlookupMapping> for MappingEntry {
    fn from(m: VlookupMapping) -> Self {
        Self {
            return_col: Some(m.return_col),
            target_col: Some(m.target_col),
            column_name: m.column_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VlookupJobOutput {
    /// Key column of the lookup sheet the join ran on.
    pub lookup_column: usize,
    /// Key column of the reference sheet the join ran on.
    pub match_column: usize,
    pub output: VlookupOutput,
    pub mappings: Vec<VlookupMapping>,
    /// The target sheet with the looked-up values written in.
    pub result: Sheet,
}

impl VlookupJobOutput {
    /// Export is allowed only when every lookup row found a match.
    #[must_use]
    pub fn is_exportable(&self) -> bool {
        self.output.no_match_count == 0
    }

    /// `book` with the target sheet swapped for the joined one.
    pub fn into_book(self, book: &Book) -> JobResult<Book> {
        let mut updated = book.clone();
        let name = self.result.name().to_string();
        updated.replace_sheet(&name, self.result)?;
        Ok(updated)
    }
}

/// Resolve the job's sheets in `book`, join, and write into the target.
pub fn run_vlookup(job: &VlookupJob, book: &Book) -> JobResult<VlookupJobOutput> {
    let lookup = book.get_sheet(&job.lookup_sheet)?;
    let reference = book.get_sheet(&job.reference_sheet)?;
    let target = book.get_sheet(&job.target_sheet)?;

    let mappings = job
        .return_mappings
        .iter()
        .enumerate()
        .map(|(index, entry)| entry.complete().ok_or(JobError::IncompleteMapping { index }))
        .collect::<JobResult<Vec<_>>>()?;

    let (lookup_column, match_column) = resolve_key_columns(
        lookup.headers(),
        reference.headers(),
        job.lookup_column,
        job.match_column,
    );
    if job.lookup_column.is_none() || job.match_column.is_none() {
        tracing::debug!(lookup_column, match_column, "key columns chosen by header");
    }

    let output = perform_vlookup(
        lookup.data(),
        lookup_column,
        reference.data(),
        match_column,
        &mappings,
    );
    let result = apply_results(target, &mappings, &output);

    tracing::info!(
        lookup = %job.lookup_sheet,
        reference = %job.reference_sheet,
        target = %job.target_sheet,
        lookup_column,
        match_column,
        matched = output.match_count,
        unmatched = output.no_match_count,
        "vlookup job finished"
    );

    Ok(VlookupJobOutput {
        lookup_column,
        match_column,
        output,
        mappings,
        result,
    })
}
