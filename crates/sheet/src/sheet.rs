use crate::cell::CellValue;
use serde::{Deserialize, Serialize};

static NULL_CELL: CellValue = CellValue::Null;

/// A parsed sheet: a header row plus row-major data.
///
/// Rows may be shorter than `headers`; missing trailing cells read as
/// [`CellValue::Null`]. Data row `i` sits on spreadsheet row `i + 2`
/// because the header occupies row 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            headers: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from explicit headers and data rows
    #[must_use]
    pub fn new<H, T>(name: &str, headers: Vec<H>, data: Vec<Vec<T>>) -> Self
    where
        H: Into<String>,
        T: Into<CellValue>,
    {
        Sheet {
            name: name.to_string(),
            headers: headers.into_iter().map(Into::into).collect(),
            data: data
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Build a sheet from a decoded grid: the first row becomes the headers,
    /// every following row becomes data.
    #[must_use]
    pub fn from_grid(name: &str, mut grid: Vec<Vec<CellValue>>) -> Self {
        if grid.is_empty() {
            return Self::with_name(name);
        }
        let data = grid.split_off(1);
        let headers = grid
            .pop()
            .unwrap_or_default()
            .iter()
            .map(CellValue::as_str)
            .collect();

        Sheet {
            name: name.to_string(),
            headers,
            data,
        }
    }

    /// The header row followed by the data rows, as handed to a writer.
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<CellValue>> {
        let mut grid = Vec::with_capacity(self.data.len() + 1);
        grid.push(
            self.headers
                .iter()
                .map(|h| CellValue::String(h.clone()))
                .collect(),
        );
        grid.extend(self.data.iter().cloned());
        grid
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Column headers in order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Vec<String> {
        &mut self.headers
    }

    /// Data rows (header excluded)
    #[must_use]
    pub fn data(&self) -> &[Vec<CellValue>] {
        &self.data
    }

    /// Get the number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns, as defined by the header row
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Check if the sheet has no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a cell by 0-based data row and column; anything outside the
    /// stored grid reads as `Null`.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL_CELL)
    }

    /// Stringified, trimmed values of one column, one entry per data row.
    #[must_use]
    pub fn column_keys(&self, col: usize) -> Vec<String> {
        (0..self.data.len())
            .map(|row| self.cell(row, col).as_key())
            .collect()
    }

    /// Set a cell, growing the row (with empty strings) and the data
    /// (with empty rows) as needed.
    pub fn set_cell<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) {
        if self.data.len() <= row {
            self.data.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.data[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::String(String::new()));
        }
        cells[col] = value.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid_splits_header() {
        let grid = vec![
            vec![CellValue::from("id"), CellValue::from("name")],
            vec![CellValue::Int(1), CellValue::from("Alice")],
            vec![CellValue::Int(2)],
        ];
        let sheet = Sheet::from_grid("People", grid);

        assert_eq!(sheet.name(), "People");
        assert_eq!(sheet.headers(), &["id".to_string(), "name".to_string()]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(1, 1), &CellValue::Null);
        assert_eq!(sheet.cell(10, 10), &CellValue::Null);
    }

    #[test]
    fn test_from_grid_empty() {
        let sheet = Sheet::from_grid("Empty", Vec::new());
        assert!(sheet.headers().is_empty());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_to_grid_roundtrip() {
        let sheet = Sheet::new("S", vec!["a", "b"], vec![vec!["1", "2"]]);
        let restored = Sheet::from_grid("S", sheet.to_grid());
        assert_eq!(restored, sheet);
    }

    #[test]
    fn test_column_keys_trim_and_pad() {
        let sheet = Sheet::new(
            "S",
            vec!["id", "x"],
            vec![
                vec![CellValue::from(" a "), CellValue::Null],
                vec![CellValue::Float(2.0)],
                vec![],
            ],
        );
        assert_eq!(sheet.column_keys(0), vec!["a", "2", ""]);
        assert_eq!(sheet.column_keys(5), vec!["", "", ""]);
    }

    #[test]
    fn test_set_cell_grows() {
        let mut sheet = Sheet::new("S", vec!["a"], vec![vec!["x"]]);
        sheet.set_cell(2, 2, "z");

        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.data()[1], Vec::<CellValue>::new());
        assert_eq!(
            sheet.data()[2],
            vec![
                CellValue::from(""),
                CellValue::from(""),
                CellValue::from("z")
            ]
        );
    }
}
