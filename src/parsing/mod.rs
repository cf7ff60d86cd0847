//! Parsers for delimited ranking, capacity, and matching files.
//!
//! This module provides parsers for:
//!
//! - **Ranking files**: one row per participant, its identifier followed by
//!   rank positions from most to least preferred
//! - **Capacity files**: `host,capacity` rows
//! - **Matching files**: `host,proposer,...` rows, as written by `solve`
//!
//! All inputs may be gzip-compressed. Blank lines and lines starting with `#`
//! are ignored, and errors report the 1-based line number.
//!
//! ## Example
//!
//! ```rust
//! use mentor_match::parsing::rankings::parse_rankings_text;
//! use mentor_match::parsing::rows::DelimitedFormat;
//!
//! // S1 ranks M2 and M3 equally, then M1
//! let rows = parse_rankings_text("S1,M2|M3,M1\n", &DelimitedFormat::default()).unwrap();
//! assert_eq!(rows[0].groups.len(), 2);
//! ```
//!
//! ## Delimiters
//!
//! | Separator | Default | Meaning |
//! |-----------|---------|---------|
//! | field | `,` (tab for `.tsv`) | Separates rank positions |
//! | tie | `\|` | Joins identifiers ranked equally |

pub mod assignments;
pub mod capacities;
pub mod rankings;
pub mod rows;

pub use rows::{DelimitedFormat, ParseError};
