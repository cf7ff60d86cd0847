use std::path::Path;

use crate::core::preference::RankingRow;
use crate::core::types::ParticipantId;
use crate::parsing::rows::{data_rows, read_text, DelimitedFormat, ParseError};

/// Parse a ranking file: one row per participant, rank positions left to right
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_rankings_file(path: &Path, format: &DelimitedFormat) -> Result<Vec<RankingRow>, ParseError> {
    let content = read_text(path)?;
    parse_rankings_text(&content, format)
}

/// Parse ranking text.
///
/// The first field of a row names the participant; each following field is
/// one rank position. A field holding several identifiers joined by the tie
/// delimiter is a tie-group:
///
/// ```text
/// S1,M2|M3,M1
/// ```
///
/// means S1 ranks M2 and M3 equally first, then M1.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a participant name is missing or
/// contains the tie delimiter, or `ParseError::TooManyRows` if the row limit is exceeded.
pub fn parse_rankings_text(text: &str, format: &DelimitedFormat) -> Result<Vec<RankingRow>, ParseError> {
    let mut rankings = Vec::new();

    for row in data_rows(text, format.delimiter)? {
        let (id, positions) = row
            .fields
            .split_first()
            .ok_or_else(|| ParseError::InvalidFormat(format!("Line {} is empty", row.line)))?;
        if id.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Line {}: missing participant identifier",
                row.line
            )));
        }

        if id.contains(format.tie_delimiter) {
            return Err(ParseError::InvalidFormat(format!(
                "Line {}: participant name '{id}' contains the tie delimiter '{}'",
                row.line, format.tie_delimiter
            )));
        }

        let groups = positions
            .iter()
            .map(|field| {
                field
                    .split(format.tie_delimiter)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ParticipantId::from)
                    .collect::<Vec<_>>()
            })
            .filter(|group| !group.is_empty())
            .collect();

        rankings.push(RankingRow::new(*id, groups).with_line(row.line));
    }

    Ok(rankings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_rankings() {
        let text = "S1,M2,M1,M3\nS2,M3\nS3,M1,M2\n";
        let rows = parse_rankings_text(text, &DelimitedFormat::default()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], RankingRow::strict("S1", ["M2", "M1", "M3"]).with_line(1));
        assert_eq!(rows[1].groups.len(), 1);
        assert_eq!(rows[2].line, Some(3));
    }

    #[test]
    fn test_parse_tied_rankings() {
        let text = "S1,M2 | M3,M1\n";
        let rows = parse_rankings_text(text, &DelimitedFormat::default()).unwrap();
        assert_eq!(
            rows[0].groups,
            vec![
                vec![ParticipantId::from("M2"), ParticipantId::from("M3")],
                vec![ParticipantId::from("M1")],
            ]
        );
    }

    #[test]
    fn test_parse_tab_delimited_with_custom_ties() {
        let format = DelimitedFormat {
            delimiter: '\t',
            tie_delimiter: ';',
        };
        let rows = parse_rankings_text("M1\tS1;S2\tS3\n", &format).unwrap();
        assert_eq!(rows[0].id.as_str(), "M1");
        assert_eq!(rows[0].groups.len(), 2);
        assert_eq!(rows[0].groups[0].len(), 2);
    }

    #[test]
    fn test_participant_without_rankings() {
        let rows = parse_rankings_text("S1\nS2,,\n", &DelimitedFormat::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].groups.is_empty());
        assert!(rows[1].groups.is_empty());
    }

    #[test]
    fn test_missing_participant_rejected() {
        let err = parse_rankings_text("S1,M1\n,M2,M1\n", &DelimitedFormat::default()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
        assert!(err.to_string().contains("Line 2: missing participant identifier"));
    }

    #[test]
    fn test_skipped_rank_position_is_ignored() {
        let rows = parse_rankings_text("S1,M2,,M1\n", &DelimitedFormat::default()).unwrap();
        assert_eq!(rows[0], RankingRow::strict("S1", ["M2", "M1"]).with_line(1));
    }

    #[test]
    fn test_tie_delimiter_in_name_rejected() {
        let err = parse_rankings_text("S1|S2,M1\n", &DelimitedFormat::default()).unwrap_err();
        assert!(err.to_string().contains("Line 1"));
    }
}
