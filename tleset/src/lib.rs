//! Grouping and validation of raw three-line element text

pub use crate::parser::{parse_element_sets, ParseError};

pub mod parser;

/// Lines per element record: name, line 1, line 2
pub const LINES_PER_RECORD: usize = 3;
