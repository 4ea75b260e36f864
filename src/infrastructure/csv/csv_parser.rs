// ============================================================
// CSV PARSER
// ============================================================
// Stream catalog exports row by row with per-cell encoding normalization

use std::fs::File;
use std::path::Path;

use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};

use super::encoding;
use crate::domain::csv::CatalogRow;
use crate::domain::error::{AppError, Result};

/// CSV parser configured for catalog exports
pub struct CsvParser {
    /// Delimiter character (default: semicolon)
    delimiter: u8,

    /// Enclosure character (default: double quote)
    quote: u8,

    /// Escape character inside quoted fields (default: backslash)
    escape: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b';',
            quote: b'"',
            escape: b'\\',
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Open `path` and read its header row.
    ///
    /// Data rows are produced lazily by the returned [`CatalogCsv`].
    pub fn open(&self, path: &Path) -> Result<CatalogCsv> {
        if !path.exists() {
            return Err(AppError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path).map_err(|e| {
            AppError::IoError(format!("Cannot open {}: {}", path.display(), e))
        })?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .escape(Some(self.escape))
            .double_quote(true)
            .has_headers(false)
            .flexible(true) // Allow rows with different lengths
            .from_reader(file);

        let mut header_record = ByteRecord::new();
        let has_header = reader.read_byte_record(&mut header_record).map_err(|e| {
            AppError::IoError(format!("Failed to read CSV header of {}: {}", path.display(), e))
        })?;
        if !has_header {
            return Err(AppError::EmptyInput(format!(
                "CSV header is empty or file not readable: {}",
                path.display()
            )));
        }

        let header: Vec<String> = header_record
            .iter()
            .map(|cell| {
                encoding::to_utf8(cell)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();
        if header.iter().all(String::is_empty) {
            return Err(AppError::EmptyInput(format!(
                "CSV header is empty: {}",
                path.display()
            )));
        }

        Ok(CatalogCsv {
            header,
            records: reader.into_byte_records(),
            last_line: 1,
        })
    }
}

/// An opened catalog export: the decoded header plus a single forward pass
/// over the data rows.
pub struct CatalogCsv {
    header: Vec<String>,
    records: ByteRecordsIntoIter<File>,
    last_line: usize,
}

impl CatalogCsv {
    /// Header cells, decoded and trimmed
    pub fn header(&self) -> &[String] {
        &self.header
    }
}

impl Iterator for CatalogCsv {
    type Item = Result<CatalogRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(match record {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|pos| pos.line() as usize)
                    .unwrap_or(self.last_line + 1);
                self.last_line = line;
                let cells = record.iter().map(encoding::to_utf8).collect();
                Ok(CatalogRow::new(line, cells))
            }
            Err(e) => {
                self.last_line += 1;
                Err(AppError::ParseError(format!(
                    "Failed to parse CSV row near line {}: {}",
                    self.last_line, e
                )))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_header_and_rows() {
        let file = write_csv(
            b" (id) ;Name (EN);Description (EN)\nid.123;Red Widgets;A nice widget\n",
        );
        let mut csv = CsvParser::new().open(file.path()).unwrap();

        assert_eq!(csv.header(), &["(id)", "Name (EN)", "Description (EN)"]);
        let row = csv.next().unwrap().unwrap();
        assert_eq!(row.line, 2);
        assert_eq!(row.cells, vec!["id.123", "Red Widgets", "A nice widget"]);
        assert!(csv.next().is_none());
    }

    #[test]
    fn test_quotes_and_backslash_escape() {
        let file = write_csv(b"id;name\n1;\"Chair; \\\"deluxe\\\"\"\n");
        let mut csv = CsvParser::new().open(file.path()).unwrap();

        let row = csv.next().unwrap().unwrap();
        assert_eq!(row.value(Some(1)), "Chair; \"deluxe\"");
    }

    #[test]
    fn test_decodes_windows_1251_cells() {
        let (name, _, _) = encoding_rs::WINDOWS_1251.encode("Столове");
        let mut bytes = b"id;name\n7;".to_vec();
        bytes.extend_from_slice(&name);
        bytes.push(b'\n');
        let file = write_csv(&bytes);

        let row = CsvParser::new().open(file.path()).unwrap().next().unwrap().unwrap();
        assert_eq!(row.value(Some(1)), "Столове");
    }

    #[test]
    fn test_header_byte_order_mark_is_dropped() {
        let file = write_csv("\u{feff}Код;Web name (EN)\nCH-1;Chair\n".as_bytes());
        let csv = CsvParser::new().open(file.path()).unwrap();

        assert_eq!(csv.header()[0], "Код");
    }

    #[test]
    fn test_missing_file() {
        let result = CsvParser::new().open(Path::new("/nonexistent/catalog.csv"));
        assert!(matches!(result, Err(AppError::FileNotFound(_))));
    }

    #[test]
    fn test_empty_file() {
        let file = write_csv(b"");
        let result = CsvParser::new().open(file.path());
        assert!(matches!(result, Err(AppError::EmptyInput(_))));
    }

    #[test]
    fn test_custom_delimiter() {
        let file = write_csv(b"Code,Web name (EN)\nA1,Chair\n");
        let mut csv = CsvParser::new().with_delimiter(b',').open(file.path()).unwrap();

        assert_eq!(csv.header().len(), 2);
        assert_eq!(csv.next().unwrap().unwrap().value(Some(0)), "A1");
    }
}
