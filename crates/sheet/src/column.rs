use crate::error::{Result, SheetError};

/// Convert column letters to a 0-based column index
/// A=0, B=1, ... Z=25, AA=26, AB=27, ...
///
/// Letters are case-insensitive.
pub fn parse_column_letters(col_str: &str) -> Result<usize> {
    if col_str.is_empty() {
        return Err(SheetError::InvalidColumn(col_str.to_string()));
    }

    let mut col: usize = 0;
    for b in col_str.bytes() {
        let upper = b.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return Err(SheetError::InvalidColumn(col_str.to_string()));
        }
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(usize::from(upper - b'A') + 1))
            .ok_or_else(|| SheetError::InvalidColumn(col_str.to_string()))?;
    }

    Ok(col - 1)
}

/// Convert a 0-based column index to column letters
/// 0=A, 1=B, ... 25=Z, 26=AA, 27=AB, ...
pub fn column_index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut col = index + 1;

    while col > 0 {
        col -= 1;
        result.insert(0, ((col % 26) as u8 + b'A') as char);
        col /= 26;
    }

    result
}

/// Parse a column reference given either as letters (`"C"`) or as a
/// 0-based index (`"2"`).
pub fn parse_column_ref(reference: &str) -> Result<usize> {
    let reference = reference.trim();
    if reference.bytes().all(|b| b.is_ascii_digit()) && !reference.is_empty() {
        return reference
            .parse::<usize>()
            .map_err(|_| SheetError::InvalidColumn(reference.to_string()));
    }
    parse_column_letters(reference)
}

/// Label used when presenting a column choice, e.g. `"B — Name"`.
pub fn column_label(index: usize, header: &str) -> String {
    format!("{} — {}", column_index_to_letter(index), header)
}
