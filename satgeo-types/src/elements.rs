use serde::{Deserialize, Serialize};

/// Unparsed three-line element record
/// https://en.wikipedia.org/wiki/Two-line_element_set
///
/// Field-level validation is deferred to the propagator; this is just
/// the raw text block, grouped and trimmed.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct RawElementSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl RawElementSet {
    pub fn new<N, L1, L2>(name: N, line1: L1, line2: L2) -> Self
    where
        N: Into<String>,
        L1: Into<String>,
        L2: Into<String>,
    {
        Self {
            name: name.into(),
            line1: line1.into(),
            line2: line2.into(),
        }
    }
}
