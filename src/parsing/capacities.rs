use std::path::Path;

use crate::parsing::rows::{data_rows, read_text, DelimitedFormat, ParseError};

/// Parse a capacity file of `host<delim>capacity` rows
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_capacities_file(path: &Path, format: &DelimitedFormat) -> Result<Vec<(String, i64)>, ParseError> {
    let content = read_text(path)?;
    parse_capacities_text(&content, format)
}

/// Parse capacity text into raw `(host, capacity)` entries.
///
/// Values are returned unchecked; positivity and duplicate hosts are checked
/// by [`CapacityTable::new`](crate::core::capacity::CapacityTable::new).
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row does not have exactly two
/// fields or the capacity is not an integer.
pub fn parse_capacities_text(text: &str, format: &DelimitedFormat) -> Result<Vec<(String, i64)>, ParseError> {
    let mut entries = Vec::new();

    for row in data_rows(text, format.delimiter)? {
        let [host, value] = row.fields.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "Line {}: expected 'host{}capacity', found {} field(s)",
                row.line,
                format.delimiter.escape_default(),
                row.fields.len()
            )));
        };

        if host.is_empty() {
            return Err(ParseError::InvalidFormat(format!("Line {}: missing host identifier", row.line)));
        }

        let capacity: i64 = value.parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Line {}: invalid capacity '{value}' for host {host}",
                row.line
            ))
        })?;

        entries.push(((*host).to_string(), capacity));
    }

    Ok(entries)
}
