//! Console output for the subcommands.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use sheetql_core::{
    display_row, matchable_columns, RowFinding, SqlJobOutput, ValidationResult, VlookupJob,
    VlookupJobOutput,
};
use sheetql_sheet::{column_index_to_letter, column_label, Book, Sheet};
use std::path::Path;

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON document
    Json,
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// For each column of `sheet`, the other sheets with a column of the same
/// header, i.e. the sheets it can be joined against.
fn column_matches<'a>(book: &'a Book, name: &str, sheet: &Sheet) -> Vec<Vec<&'a str>> {
    let mut matches = vec![Vec::new(); sheet.col_count()];
    for (other_name, other) in book.sheets().filter(|(n, _)| *n != name) {
        let matchable = matchable_columns(sheet.headers(), other.headers());
        for (col, _) in matchable.iter().enumerate().filter(|(_, m)| **m) {
            matches[col].push(other_name);
        }
    }
    matches
}

/// Column listing for one sheet; joinable columns are marked.
pub fn column_lines(book: &Book, name: &str, sheet: &Sheet) -> Vec<String> {
    column_matches(book, name, sheet)
        .iter()
        .zip(sheet.headers())
        .enumerate()
        .map(|(i, (sheets, header))| {
            let label = column_label(i, header);
            if sheets.is_empty() {
                format!("  {label}")
            } else {
                format!("  ✅ {label} [matches: {}]", sheets.join(", "))
            }
        })
        .collect()
}

/// List every sheet with its size and column labels.
pub fn print_sheets(book: &Book, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let sheets: Vec<_> = book
                .sheets()
                .map(|(name, sheet)| {
                    json!({
                        "name": name,
                        "rows": sheet.row_count(),
                        "headers": sheet.headers(),
                        "matches": column_matches(book, name, sheet),
                    })
                })
                .collect();
            print_json(&json!({ "book": book.name(), "sheets": sheets }))
        }
        OutputFormat::Text => {
            for (name, sheet) in book.sheets() {
                println!(
                    "{} ({} rows)",
                    name.cyan().bold(),
                    sheet.row_count()
                );
                for line in column_lines(book, name, sheet) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

/// Lines describing key problems, empty when the keys are clean.
pub fn validation_lines(validation: &ValidationResult) -> Vec<String> {
    let mut lines = Vec::new();
    if validation.has_duplicates {
        lines.push("Duplicate Primary Keys Detected".to_string());
        for dup in &validation.duplicates {
            let rows: Vec<String> = dup.rows.iter().map(ToString::to_string).collect();
            lines.push(format!("  \"{}\" — rows {}", dup.value, rows.join(", ")));
        }
    }
    if validation.has_empty_pks {
        let rows: Vec<String> = validation
            .empty_pk_rows
            .iter()
            .map(ToString::to_string)
            .collect();
        lines.push("Empty Primary Key Values".to_string());
        lines.push(format!("  Rows: {}", rows.join(", ")));
    }
    lines
}

/// One line per row whose key is duplicated or empty, by display row.
pub fn flagged_lines(validation: &ValidationResult) -> Vec<String> {
    validation
        .flagged_rows()
        .into_iter()
        .map(|(index, finding)| match finding {
            RowFinding::Duplicate { value } => {
                format!("  Row {}: duplicate key \"{value}\"", display_row(index))
            }
            RowFinding::EmptyPk => format!("  Row {}: empty key", display_row(index)),
        })
        .collect()
}

/// Summary of an INSERT/UPDATE run; `detailed` also lists flagged rows.
pub fn print_sql(
    mode: &str,
    output: &SqlJobOutput,
    written: Option<&Path>,
    detailed: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let flagged = detailed.then(|| {
                output
                    .validation
                    .flagged_rows()
                    .into_iter()
                    .map(|(index, finding)| json!({ "row": display_row(index), "finding": finding }))
                    .collect::<Vec<_>>()
            });
            print_json(&json!({
                "mode": mode,
                "statements": output.statements.len(),
                "output": written.map(|p| p.display().to_string()),
                "validation": output.validation,
                "flaggedRows": flagged,
                "generatedIds": output.generated_ids,
            }))
        }
        OutputFormat::Text => {
            for line in validation_lines(&output.validation) {
                if line.starts_with(' ') {
                    println!("{line}");
                } else {
                    println!("{} {}", "Warning:".yellow().bold(), line.yellow());
                }
            }
            if detailed {
                for line in flagged_lines(&output.validation) {
                    println!("{line}");
                }
            }
            println!(
                "{} {} {mode} statement(s)",
                "Generated".green().bold(),
                output.statements.len()
            );
            if let Some(path) = written {
                println!("{} {}", "Wrote".green().bold(), path.display());
            }
            Ok(())
        }
    }
}

/// Summary of a VLOOKUP run; `detailed` also lists unmatched rows.
pub fn print_vlookup(
    job: &VlookupJob,
    output: &VlookupJobOutput,
    written: Option<&Path>,
    detailed: bool,
    format: OutputFormat,
) -> Result<()> {
    let stats = &output.output;
    match format {
        OutputFormat::Json => print_json(&json!({
            "job": job,
            "lookupColumn": output.lookup_column,
            "matchColumn": output.match_column,
            "matchCount": stats.match_count,
            "noMatchCount": stats.no_match_count,
            "duplicateKeysInReference": stats.duplicate_keys_in_reference,
            "unmatchedRows": detailed.then(|| stats.unmatched_rows()),
            "output": written.map(|p| p.display().to_string()),
        })),
        OutputFormat::Text => {
            println!(
                "Key columns: {}!{} = {}!{}",
                job.lookup_sheet,
                column_index_to_letter(output.lookup_column),
                job.reference_sheet,
                column_index_to_letter(output.match_column)
            );
            println!("{} {} matched", "✓".green().bold(), stats.match_count);
            if stats.no_match_count > 0 {
                println!("{} {} without match", "✗".red().bold(), stats.no_match_count);
            }
            if stats.duplicate_keys_in_reference > 0 {
                println!(
                    "{} {} duplicate key(s) in '{}', first occurrence used",
                    "Warning:".yellow().bold(),
                    stats.duplicate_keys_in_reference,
                    job.reference_sheet
                );
            }
            if detailed && stats.no_match_count > 0 {
                let rows: Vec<String> = stats
                    .unmatched_rows()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("  Unmatched rows: {}", rows.join(", "));
            }
            if let Some(path) = written {
                println!("{} {}", "Wrote".green().bold(), path.display());
            }
            Ok(())
        }
    }
}
