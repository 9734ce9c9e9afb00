//! Sheet/Book model for sheetql
//!
//! A parsed sheet is a header row plus ordered data rows of scalar cells.
//! This crate is the spreadsheet codec used by the CLI: it decodes
//! xlsx/xlsm/xlsb/xls/ods workbooks (via calamine) and CSV/TSV files into
//! [`Sheet`]s, and writes books back out as xlsx (via rust_xlsxwriter).
//!
//! # Examples
//!
//! ```
//! use sheetql_sheet::{CellValue, Sheet};
//!
//! let sheet = Sheet::new(
//!     "People",
//!     vec!["id", "name"],
//!     vec![vec![CellValue::Int(1), CellValue::from("Alice")]],
//! );
//!
//! assert_eq!(sheet.col_count(), 2);
//! assert_eq!(sheet.cell(0, 1).as_str(), "Alice");
//! // Anything past the end of a row reads as Null
//! assert!(sheet.cell(0, 5).is_null());
//! ```
//!
//! ```no_run
//! use sheetql_sheet::Book;
//!
//! let book = Book::open("customers.xlsx").unwrap();
//! for name in book.sheet_names() {
//!     println!("{name}");
//! }
//! ```

mod book;
mod cell;
mod column;
mod csv;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export column letter helpers.
pub use column::{column_index_to_letter, column_label, parse_column_letters, parse_column_ref};
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
