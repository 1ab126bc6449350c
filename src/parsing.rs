//! Input file loading
//!
//! This module reads the delimited source file into a [`RecordTable`],
//! preserving column names, row order and empty cells verbatim.

use crate::common::RecordTable;
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during file parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Input file does not exist: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read input file: {0}")]
    FileRead(#[from] io::Error),

    #[error("Malformed delimited data: {0}")]
    MalformedData(#[from] csv::Error),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Parse the source file and load the table for analysis
///
/// The first row is the header; every following row must carry the same
/// number of cells. A header-only file yields a zero-row table.
///
/// # Arguments
/// * `file_path` - Path to the delimited UTF-8 input file
///
/// # Returns
/// * `Ok(RecordTable)` - Successfully loaded table
/// * `Err(ParsingError)` - If the file is absent, unreadable, or malformed
pub fn load_record_table(file_path: &Path) -> Result<RecordTable> {
    let file = File::open(file_path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ParsingError::FileNotFound {
                path: file_path.display().to_string(),
            }
        } else {
            ParsingError::FileRead(e)
        }
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM;
    // left in place it would make schema validation miss the column
    if let Some(first) = headers.first_mut() {
        *first = first.trim_start_matches('\u{feff}').to_owned();
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(RecordTable { headers, rows })
}
