use crate::cell::CellValue;
use crate::error::Result;
use crate::sheet::Sheet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// CSV reader/writer options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Whether to use type inference when reading
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Create options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: b'\t',
            ..Default::default()
        }
    }
}

impl Sheet {
    /// Load a sheet from a CSV file; the first record is the header row
    pub fn from_csv_with_options<P: AsRef<Path>>(path: P, options: CsvOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        Self::from_csv_reader(reader, options)
    }

    /// Load a sheet from a CSV string
    pub fn from_csv_str(content: &str) -> Result<Self> {
        Self::from_csv_reader(content.as_bytes(), CsvOptions::default())
    }

    /// Load a sheet from a reader.
    ///
    /// Records may have any length. A leading byte order mark, as written by
    /// spreadsheet programs, is dropped from the first header.
    pub fn from_csv_reader<R: Read>(reader: R, options: CsvOptions) -> Result<Self> {
        let mut records = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        let Some(first) = records.next().transpose()? else {
            return Ok(Sheet::with_name("Sheet1"));
        };
        let mut grid = vec![first
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let field = if i == 0 { field.trim_start_matches('\u{feff}') } else { field };
                CellValue::String(field.to_string())
            })
            .collect::<Vec<_>>()];

        for record in records {
            let record = record?;
            grid.push(
                record
                    .iter()
                    .map(|field| {
                        if options.infer_types {
                            CellValue::parse(field)
                        } else {
                            CellValue::from(field)
                        }
                    })
                    .collect(),
            );
        }

        Ok(Sheet::from_grid("Sheet1", grid))
    }

    /// Save the sheet (header row included) to a CSV file
    pub fn save_as_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.write_csv(writer, CsvOptions::default())
    }

    /// Write the sheet to a writer as CSV
    pub fn write_csv<W: Write>(&self, writer: W, options: CsvOptions) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .flexible(true)
            .from_writer(writer);

        csv_writer.write_record(self.headers())?;
        for row in self.data() {
            let record: Vec<String> = row.iter().map(CellValue::as_str).collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::approx_constant)]
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_from_csv_str() {
        let csv = "name,age,city\nAlice,30,NYC\nBob,25,LA";
        let sheet = Sheet::from_csv_str(csv).unwrap();

        assert_eq!(sheet.headers(), &["name", "age", "city"]);
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(0, 1), &CellValue::Int(30));
    }

    #[test]
    fn test_header_row_not_inferred() {
        let csv = "1,true\nx,y";
        let sheet = Sheet::from_csv_str(csv).unwrap();
        assert_eq!(sheet.headers(), &["1", "true"]);
    }

    #[test]
    fn test_type_inference() {
        let csv = "string,int,float,bool,empty\nhello,42,3.14,true,";
        let sheet = Sheet::from_csv_str(csv).unwrap();

        assert_eq!(sheet.cell(0, 0), &CellValue::String("hello".to_string()));
        assert_eq!(sheet.cell(0, 1), &CellValue::Int(42));
        assert_eq!(sheet.cell(0, 2), &CellValue::Float(3.14));
        assert_eq!(sheet.cell(0, 3), &CellValue::Bool(true));
        assert_eq!(sheet.cell(0, 4), &CellValue::Null);
    }

    #[test]
    fn test_without_inference() {
        let options = CsvOptions {
            infer_types: false,
            ..Default::default()
        };
        let sheet = Sheet::from_csv_reader("id\n007".as_bytes(), options).unwrap();
        assert_eq!(sheet.cell(0, 0), &CellValue::String("007".to_string()));
    }

    #[test]
    fn test_ragged_rows() {
        let csv = "a,b,c\n1\n1,2,3,4";
        let sheet = Sheet::from_csv_str(csv).unwrap();
        assert_eq!(sheet.data()[0].len(), 1);
        assert_eq!(sheet.data()[1].len(), 4);
    }

    #[test]
    fn test_tsv() {
        let tsv = "name\tage\nAlice\t30";
        let sheet = Sheet::from_csv_reader(tsv.as_bytes(), CsvOptions::tsv()).unwrap();
        assert_eq!(sheet.headers(), &["name", "age"]);
        assert_eq!(sheet.cell(0, 1), &CellValue::Int(30));
    }

    #[test]
    fn test_save_and_load_csv_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.csv");

        let sheet = Sheet::new("S", vec!["a", "b"], vec![vec![1, 2], vec![3, 4]]);
        sheet.save_as_csv(&file_path).unwrap();

        let loaded = Sheet::from_csv_with_options(&file_path, CsvOptions::default()).unwrap();
        assert_eq!(loaded.headers(), sheet.headers());
        assert_eq!(loaded.data(), sheet.data());
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let sheet = Sheet::new("S", vec!["x"], vec![vec!["O'Brien, Pat"]]);
        let mut buffer = Vec::new();
        sheet.write_csv(&mut buffer, CsvOptions::default()).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "x\n\"O'Brien, Pat\"\n");
    }

    #[test]
    fn test_byte_order_mark_dropped() {
        let sheet = Sheet::from_csv_str("\u{feff}id,name\n1,a").unwrap();
        assert_eq!(sheet.headers(), &["id", "name"]);
    }

    #[test]
    fn test_empty_input() {
        let sheet = Sheet::from_csv_str("").unwrap();
        assert!(sheet.headers().is_empty());
        assert!(sheet.is_empty());
    }
}
