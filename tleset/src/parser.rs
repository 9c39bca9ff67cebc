//! A line-oriented parser for raw element text fetched from catalog feeds.
//!
//! Splits the input into trimmed non-empty lines and groups every three
//! into one `{name, line1, line2}` record. Per-line checksum/format
//! validation is deliberately left to the propagator, which rejects an
//! unparsable element line with a per-record error rather than failing
//! the whole batch.

use crate::LINES_PER_RECORD;
use nom::{
    character::complete::{line_ending, not_line_ending},
    combinator::opt,
    IResult,
};
use satgeo_types::prelude::RawElementSet;
use tracing::debug;

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The batch as a whole is rejected; no partial records are produced
    #[error("element text has {lines} non-empty lines, expected a multiple of 3")]
    UnalignedLineCount { lines: usize },
}

fn raw_line(s: &str) -> IResult<&str, &str> {
    let (s, line) = not_line_ending(s)?;
    let (s, _) = opt(line_ending)(s)?;
    Ok((s, line))
}

/// Parse a full element-text batch into records.
///
/// Blank lines are ignored wherever they appear. Fails if the non-empty
/// line count is not a multiple of 3.
pub fn parse_element_sets(text: &str) -> Result<Vec<RawElementSet>, ParseError> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        // `not_line_ending` + `line_ending` always consume at least one
        // byte of a non-empty input, so this terminates
        let (s, line) = match raw_line(rest) {
            Ok(r) => r,
            Err(_) => break,
        };
        rest = s;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }

    if lines.len() % LINES_PER_RECORD != 0 {
        return Err(ParseError::UnalignedLineCount { lines: lines.len() });
    }

    let records = lines
        .chunks_exact(LINES_PER_RECORD)
        .map(|chunk| RawElementSet::new(chunk[0], chunk[1], chunk[2]))
        .collect::<Vec<_>>();
    debug!(records = records.len(), "grouped element text");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const ISS: &str = indoc! {"
        ISS (ZARYA)
        1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
        2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
    "};

    #[test]
    fn groups_every_three_lines() {
        let records = parse_element_sets(ISS).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert!(records[0].line1.starts_with("1 25544U"));
        assert!(records[0].line2.starts_with("2 25544"));
    }

    #[test]
    fn blank_lines_and_padding_are_ignored() {
        let text = format!("\n  {}\n\n", ISS.replace('\n', "  \n\n"));
        let records = parse_element_sets(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ISS (ZARYA)");
    }

    #[test]
    fn unaligned_line_count_rejects_whole_batch() {
        let text = indoc! {"
            ISS (ZARYA)
            1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
            2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
            VANGUARD 1
            1 00005U 58002B   00179.78495062  .00000023  00000-3  28098-4 0  4753
        "};
        assert_eq!(
            parse_element_sets(text),
            Err(ParseError::UnalignedLineCount { lines: 5 })
        );
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert_eq!(parse_element_sets("").unwrap(), vec![]);
        assert_eq!(parse_element_sets("\n\n  \n").unwrap(), vec![]);
    }

    #[test]
    fn multiple_records_preserve_catalog_order() {
        let text = indoc! {"
            ISS (ZARYA)
            1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
            2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
            VANGUARD 1
            1 00005U 58002B   00179.78495062  .00000023  00000-3  28098-4 0  4753
            2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667
        "};
        let records = parse_element_sets(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "ISS (ZARYA)");
        assert_eq!(records[1].name, "VANGUARD 1");
    }
}
