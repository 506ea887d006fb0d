//! CSV ingestion for the import engine.
//!
//! Turns a UTF-8 CSV file or stream into an ordered header list and one
//! [`Row`](import_model::Row) per data line.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use import_ingest::read_csv_path;
//!
//! let upload = read_csv_path(Path::new("leads.csv"))?;
//! println!("{} rows", upload.row_count());
//! ```

#![deny(unsafe_code)]

mod error;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{
    MAX_CSV_FILE_SIZE, ParsedUpload, check_file_size, read_csv_path, read_csv_path_with_limit,
    read_csv_reader,
};
