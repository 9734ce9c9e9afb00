use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => {
            // Excel stores dates as days since 1899-12-30
            CellValue::Float(dt.as_f64())
        }
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Turn a used range into a grid anchored at column A.
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let col_offset = range.start().map_or(0, |(_, col)| col as usize);

    range
        .rows()
        .map(|row| {
            let mut cells = vec![CellValue::Null; col_offset];
            cells.extend(row.iter().map(data_to_cell_value));
            cells
        })
        .collect()
}

impl Sheet {
    /// Load a specific sheet from a spreadsheet file by name
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened, sheet not found, or read fails.
    pub fn from_xlsx_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref())?;

        if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(SheetError::SheetNotFound {
                name: sheet_name.to_string(),
            });
        }

        let range = workbook.worksheet_range(sheet_name)?;
        Ok(Sheet::from_grid(sheet_name, range_to_grid(&range)))
    }

    /// Save the sheet to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        write_to_worksheet(worksheet, self)?;
        workbook.save(path.as_ref())?;
        Ok(())
    }
}

/// Write sheet headers and data to a worksheet
fn write_to_worksheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<()> {
    worksheet.set_name(sheet.name())?;

    for (row_idx, row) in sheet.to_grid().iter().enumerate() {
        let row_num = u32::try_from(row_idx)
            .map_err(|_| SheetError::Write("Row index overflow".to_string()))?;

        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Write("Column index overflow".to_string()))?;

            match cell {
                CellValue::Null => {} // Leave empty
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                CellValue::Int(i) => {
                    // Note: Excel stores all numbers as f64, so integers > 2^53
                    // may lose precision
                    worksheet.write_number(row_num, col_num, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row_num, col_num, *f)?;
                }
                CellValue::String(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
            }
        }
    }

    Ok(())
}

impl Book {
    /// Load a book from a spreadsheet file (all sheets).
    ///
    /// Any format calamine detects from the extension is accepted
    /// (xlsx, xlsm, xlsb, xls, ods).
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;

        let book_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Book1");
        let mut book = Book::with_name(book_name);

        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;
            let sheet = Sheet::from_grid(&sheet_name, range_to_grid(&range));
            book.add_sheet(&sheet_name, sheet)?;
        }

        Ok(book)
    }

    /// Save the book to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        for (_, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            write_to_worksheet(worksheet, sheet)?;
        }
        Ok(workbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_xlsx_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.xlsx");

        let sheet = Sheet::new(
            "People",
            vec!["Name", "Age", "Active"],
            vec![
                vec![CellValue::from("Alice"), CellValue::Int(30), CellValue::Bool(true)],
                vec![CellValue::from("Bob"), CellValue::Int(25), CellValue::Bool(false)],
            ],
        );
        sheet.save_as_xlsx(&path).unwrap();

        let loaded = Sheet::from_xlsx_sheet(&path, "People").unwrap();

        assert_eq!(loaded.headers(), &["Name", "Age", "Active"]);
        assert_eq!(loaded.row_count(), 2);
        assert_eq!(loaded.cell(0, 0), &CellValue::String("Alice".to_string()));
        // Int becomes Float in Excel
        assert!(matches!(loaded.cell(0, 1), CellValue::Float(f) if (*f - 30.0).abs() < 0.01));
        assert_eq!(loaded.cell(1, 2), &CellValue::Bool(false));
    }

    #[test]
    fn test_book_xlsx_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut book = Book::new();
        book.add_sheet("Numbers", Sheet::new("n", vec!["a"], vec![vec![1]]))
            .unwrap();
        book.add_sheet("Letters", Sheet::new("l", vec!["b"], vec![vec!["x"]]))
            .unwrap();
        book.save_as_xlsx(&path).unwrap();

        let loaded = Book::from_xlsx(&path).unwrap();

        assert_eq!(loaded.name(), "book");
        assert_eq!(loaded.sheet_names(), vec!["Numbers", "Letters"]);
        assert_eq!(
            loaded.get_sheet("Letters").unwrap().cell(0, 0),
            &CellValue::String("x".to_string())
        );
    }

    #[test]
    fn test_open_dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wb.xlsx");

        let mut book = Book::new();
        book.add_sheet("Data", Sheet::new("d", vec!["k"], vec![vec!["v"]]))
            .unwrap();
        book.save_as_xlsx(&path).unwrap();

        let loaded = Book::open(&path).unwrap();
        assert_eq!(loaded.sheet_names(), vec!["Data"]);
    }

    #[test]
    fn test_missing_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.xlsx");
        Sheet::new("Only", vec!["a"], vec![vec![1]])
            .save_as_xlsx(&path)
            .unwrap();

        let result = Sheet::from_xlsx_sheet(&path, "Other");
        assert!(matches!(result, Err(SheetError::SheetNotFound { .. })));
    }
}
