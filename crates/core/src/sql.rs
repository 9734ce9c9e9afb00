//! INSERT / UPDATE statement generation.
//!
//! One statement per data row, in row order. Identifiers go through
//! [`quote_identifier`], values through [`format_value`].

use crate::config::{InsertConfig, UpdateConfig};
use crate::escape::{format_value, quote_identifier};
use sheetql_sheet::CellValue;

static NULL_CELL: CellValue = CellValue::Null;

fn cell(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&NULL_CELL)
}

fn header(headers: &[String], col: usize) -> &str {
    headers.get(col).map_or("", String::as_str)
}

/// Build `INSERT` statements for every row.
///
/// With [`IdMode::Generate`](crate::config::IdMode::Generate) and
/// `generated_ids` supplied, the PK column takes row `i`'s generated ID,
/// quoted as-is. A row without a generated ID falls back to its own cell.
pub fn generate_insert_sql(
    config: &InsertConfig,
    headers: &[String],
    data: &[Vec<CellValue>],
    generated_ids: Option<&[String]>,
) -> Vec<String> {
    let table = quote_identifier(&config.table_name);
    let ids = generated_ids.filter(|_| config.generates_ids());
    let column_list = config.include_column_names.then(|| {
        headers
            .iter()
            .map(|h| quote_identifier(h))
            .collect::<Vec<_>>()
            .join(", ")
    });

    let statements: Vec<String> = data
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let values = (0..headers.len())
                .map(|j| match ids.and_then(|ids| ids.get(i)) {
                    Some(id) if j == config.pk_column => format!("'{id}'"),
                    _ => format_value(cell(row, j), config.treat_empty_as_null),
                })
                .collect::<Vec<_>>()
                .join(", ");

            match &column_list {
                Some(columns) => format!("INSERT INTO {table} ({columns}) VALUES ({values});"),
                None => format!("INSERT INTO {table} VALUES ({values});"),
            }
        })
        .collect();

    tracing::debug!(table = %config.table_name, count = statements.len(), "generated INSERT statements");
    statements
}

/// Build `UPDATE` statements keyed on the PK column.
///
/// The PK column is never part of the SET clause. Rows that end up with no
/// SET clause produce no statement, so the output may be shorter than `data`.
pub fn generate_update_sql(
    config: &UpdateConfig,
    headers: &[String],
    data: &[Vec<CellValue>],
) -> Vec<String> {
    let table = quote_identifier(&config.table_name);
    let pk_column = quote_identifier(header(headers, config.pk_column));
    let set_columns = config.effective_set_columns();

    let mut statements = Vec::with_capacity(data.len());
    for row in data {
        // WHERE values are never turned into NULL
        let pk_value = format_value(cell(row, config.pk_column), false);

        let set_clauses: Vec<String> = set_columns
            .iter()
            .map(|&col| {
                format!(
                    "{} = {}",
                    quote_identifier(header(headers, col)),
                    format_value(cell(row, col), config.treat_empty_as_null)
                )
            })
            .collect();

        if set_clauses.is_empty() {
            continue;
        }

        statements.push(format!(
            "UPDATE {table} SET {} WHERE {pk_column} = {pk_value};",
            set_clauses.join(", ")
        ));
    }

    if statements.len() < data.len() {
        tracing::warn!(
            skipped = data.len() - statements.len(),
            "rows without SET columns were left out"
        );
    }
    tracing::debug!(table = %config.table_name, count = statements.len(), "generated UPDATE statements");
    statements
}

/// Join statements into the exported script text.
#[must_use]
pub fn render_script(statements: &[String]) -> String {
    statements.join("\n")
}
