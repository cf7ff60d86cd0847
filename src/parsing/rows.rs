use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::utils::validation::check_row_limit;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input format: {0}")]
    InvalidFormat(String),

    #[error("Too many rows: {0} exceeds maximum allowed (100000)")]
    TooManyRows(usize),
}

/// Field and tie delimiters of a ranking, capacity, or matching file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedFormat {
    /// Separates fields (rank positions) within a row
    pub delimiter: char,
    /// Separates tied identifiers within one rank position
    pub tie_delimiter: char,
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            tie_delimiter: '|',
        }
    }
}

impl DelimitedFormat {
    /// Default format for a path: tab-delimited for `.tsv`, comma otherwise
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let name = path.to_string_lossy().to_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".tsv") || name.ends_with(".tab") {
            Self {
                delimiter: '\t',
                ..Self::default()
            }
        } else {
            Self::default()
        }
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read a whole text file, decompressing gzip input
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, read, or decoded.
pub fn read_text(path: &Path) -> Result<String, ParseError> {
    if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        let mut content = String::new();
        BufReader::new(GzDecoder::new(file)).read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// A non-empty, non-comment row split into trimmed fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow<'a> {
    /// 1-based line number
    pub line: usize,
    pub fields: Vec<&'a str>,
}

/// Split text into data rows.
///
/// Blank lines and lines starting with `#` are skipped and fields are trimmed.
/// Fields keep their positions; only trailing empty fields are dropped, so
/// trailing delimiters are harmless.
///
/// # Errors
///
/// Returns `ParseError::TooManyRows` if the row limit is exceeded.
pub fn data_rows(text: &str, delimiter: char) -> Result<Vec<DataRow<'_>>, ParseError> {
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        if fields.is_empty() {
            continue;
        }

        // Check row limit for DOS protection
        if check_row_limit(rows.len()).is_some() {
            return Err(ParseError::TooManyRows(rows.len()));
        }

        rows.push(DataRow { line: i + 1, fields });
    }

    Ok(rows)
}
