use crate::csv::CsvOptions;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use indexmap::IndexMap;
use std::path::Path;

/// A book containing multiple sheets (preserves insertion order)
#[derive(Debug, Clone)]
pub struct Book {
    name: String,
    sheets: IndexMap<String, Sheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Book1")
    }

    /// Create a new empty book with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Book {
            name: name.to_string(),
            sheets: IndexMap::new(),
        }
    }

    /// Get the book name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// The first sheet, if any
    #[must_use]
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first().map(|(_, sheet)| sheet)
    }

    /// Add a sheet to the book
    pub fn add_sheet(&mut self, name: &str, sheet: Sheet) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut sheet = sheet;
        sheet.set_name(name);
        self.sheets.insert(name.to_string(), sheet);
        Ok(())
    }

    /// Swap in a new version of an existing sheet, keeping its position.
    pub fn replace_sheet(&mut self, name: &str, sheet: Sheet) -> Result<Sheet> {
        let slot = self
            .sheets
            .get_mut(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })?;

        let mut sheet = sheet;
        sheet.set_name(name);
        Ok(std::mem::replace(slot, sheet))
    }

    /// Iterate over `(name, sheet)` pairs in order
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Load a workbook, picking the codec from the file extension.
    ///
    /// Spreadsheet formats (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) load every
    /// sheet; `csv`/`tsv` load as a single sheet named after the file stem.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_xlsx(path),
            "csv" | "tsv" => {
                let options = if ext == "tsv" {
                    CsvOptions::tsv()
                } else {
                    CsvOptions::default()
                };
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Sheet1")
                    .to_string();
                let sheet = Sheet::from_csv_with_options(path, options)?;
                let mut book = Book::with_name(&stem);
                book.add_sheet(&stem, sheet)?;
                Ok(book)
            }
            _ => Err(SheetError::UnsupportedFormat(format!(
                "'{}'. Supported: xlsx, xlsm, xlsb, xls, ods, csv, tsv",
                ext
            ))),
        }
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}
