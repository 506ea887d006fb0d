//! CSV reading into headers and rows.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use import_model::Row;

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (100 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 100 * 1024 * 1024;

const UTF8_BOM: char = '\u{feff}';

/// Parsed upload: ordered headers plus one [`Row`] per data line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUpload {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl ParsedUpload {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether there is nothing to import.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}

/// Read a CSV file from disk.
pub fn read_csv_path(path: &Path) -> Result<ParsedUpload> {
    read_csv_path_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Read a CSV file from disk, rejecting files above `max_size` bytes.
pub fn read_csv_path_with_limit(path: &Path, max_size: u64) -> Result<ParsedUpload> {
    check_file_size(path, max_size)?;
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    read_csv_reader(file, path)
}

/// Check file size before loading.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Read CSV from any reader; `label` names the source in errors and logs.
///
/// The first line is the header row. Short rows read as missing values, extra
/// cells beyond the header are dropped and lines with only empty cells are
/// skipped. Cell values are kept verbatim.
pub fn read_csv_reader<R: Read>(reader: R, label: &Path) -> Result<ParsedUpload> {
    let mut buffered = BufReader::new(reader);
    let prefix = buffered.fill_buf().map_err(|e| IngestError::FileRead {
        path: label.to_path_buf(),
        source: e,
    })?;
    if let Some(encoding) = detect_utf16(prefix) {
        return Err(IngestError::UnsupportedEncoding {
            path: label.to_path_buf(),
            encoding,
        });
    }

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(buffered);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| parse_error(label, &e))?
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let header = if idx == 0 {
                header.trim_start_matches(UTF8_BOM)
            } else {
                header
            };
            header.trim().to_string()
        })
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: label.to_path_buf(),
        });
    }
    warn_on_duplicate_headers(&headers, label);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.records() {
        let record = record.map_err(|e| parse_error(label, &e))?;
        if record.iter().all(str::is_empty) {
            skipped += 1;
            continue;
        }
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.as_str(), value))
            .collect();
        rows.push(row);
    }

    debug!(
        source = %label.display(),
        headers = headers.len(),
        rows = rows.len(),
        skipped,
        "CSV parsed"
    );
    Ok(ParsedUpload { headers, rows })
}

/// Name of the UTF-16 variant announced by a byte order mark, if any.
fn detect_utf16(prefix: &[u8]) -> Option<&'static str> {
    match prefix {
        [0xFF, 0xFE, ..] => Some("UTF-16 LE"),
        [0xFE, 0xFF, ..] => Some("UTF-16 BE"),
        _ => None,
    }
}

fn warn_on_duplicate_headers(headers: &[String], label: &Path) {
    for (idx, header) in headers.iter().enumerate() {
        if !header.is_empty() && headers[..idx].contains(header) {
            warn!(
                source = %label.display(),
                header = %header,
                "duplicate header; later column wins"
            );
        }
    }
}

fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

fn parse_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
