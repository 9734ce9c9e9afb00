//! Literal and identifier formatting for PostgreSQL statement text.

use regex::Regex;
use sheetql_sheet::CellValue;
use std::sync::OnceLock;

/// Strip NUL characters and double every single quote.
pub fn escape_literal(value: &str) -> String {
    value.replace('\0', "").replace('\'', "''")
}

/// Render a cell as a SQL literal.
///
/// Absent cells become `NULL` when `treat_empty_as_null` is set and `''`
/// otherwise; an empty string becomes `NULL` only with the flag set.
pub fn format_value(value: &CellValue, treat_empty_as_null: bool) -> String {
    if value.is_null() {
        return if treat_empty_as_null { "NULL" } else { "''" }.to_string();
    }
    let text = value.as_str();
    if text.is_empty() && treat_empty_as_null {
        return "NULL".to_string();
    }
    format!("'{}'", escape_literal(&text))
}

fn plain_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid identifier regex"))
}

/// Quote an identifier unless it is already a plain lowercase identifier.
pub fn quote_identifier(name: &str) -> String {
    if plain_identifier().is_match(name) {
        return name.to_string();
    }
    format!("\"{}\"", name.replace('"', "\"\""))
}
