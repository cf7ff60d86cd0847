use std::path::Path;

use crate::core::assignment::NamedMatching;
use crate::core::types::ParticipantId;
use crate::parsing::rows::{data_rows, read_text, DelimitedFormat, ParseError};

/// Format a matching as one `host<delim>proposer<delim>...` row per host.
///
/// Every host is written, including those with nobody assigned; rows are
/// sorted by host and proposers within a row are sorted.
#[must_use]
pub fn format_matching(matching: &NamedMatching, format: &DelimitedFormat) -> String {
    let mut out = String::new();
    for (host, proposers) in matching.iter() {
        out.push_str(host.as_str());
        for proposer in proposers {
            out.push(format.delimiter);
            out.push_str(proposer.as_str());
        }
        out.push('\n');
    }
    out
}

/// Write a matching file, see [`format_matching`]
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be written.
pub fn write_matching_file(path: &Path, matching: &NamedMatching, format: &DelimitedFormat) -> Result<(), ParseError> {
    std::fs::write(path, format_matching(matching, format))?;
    Ok(())
}

/// Parse a matching file written by [`write_matching_file`]
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_matching_file(
    path: &Path,
    format: &DelimitedFormat,
) -> Result<Vec<(ParticipantId, Vec<ParticipantId>)>, ParseError> {
    let content = read_text(path)?;
    parse_matching_text(&content, format)
}

/// Parse matching text into `(host, proposers)` rows, in file order
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a row has no host, or
/// `ParseError::TooManyRows` if the row limit is exceeded.
pub fn parse_matching_text(
    text: &str,
    format: &DelimitedFormat,
) -> Result<Vec<(ParticipantId, Vec<ParticipantId>)>, ParseError> {
    let mut rows = Vec::new();

    for row in data_rows(text, format.delimiter)? {
        let Some((host, proposers)) = row.fields.split_first().filter(|(host, _)| !host.is_empty()) else {
            return Err(ParseError::InvalidFormat(format!("Line {}: missing host identifier", row.line)));
        };

        let proposers = proposers
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| ParticipantId::from(*p))
            .collect();
        rows.push((ParticipantId::from(*host), proposers));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> NamedMatching {
        let mut rows = BTreeMap::new();
        rows.insert(
            ParticipantId::from("M1"),
            vec![ParticipantId::from("S1"), ParticipantId::from("S3")],
        );
        rows.insert(ParticipantId::from("M2"), vec![]);
        NamedMatching(rows)
    }

    #[test]
    fn test_format_matching_lists_every_host() {
        let text = format_matching(&sample(), &DelimitedFormat::default());
        assert_eq!(text, "M1,S1,S3\nM2\n");
    }

    #[test]
    fn test_parse_written_matching() {
        let format = DelimitedFormat::for_path(Path::new("out.tsv"));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        write_matching_file(&path, &sample(), &format).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "M1\tS1\tS3\nM2\n");
        let rows = parse_matching_file(&path, &format).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0.as_str(), "M1");
        assert_eq!(rows[0].1.len(), 2);
        assert!(rows[1].1.is_empty());
    }

    #[test]
    fn test_parse_matching_rejects_missing_host() {
        let err = parse_matching_text("M1,S1\n,S2\n", &DelimitedFormat::default()).unwrap_err();
        assert!(err.to_string().contains("Line 2: missing host identifier"));

        let rows = parse_matching_text("M1,S1,,S2\n", &DelimitedFormat::default()).unwrap();
        assert_eq!(rows[0].1, vec![ParticipantId::from("S1"), ParticipantId::from("S2")]);
    }
}
