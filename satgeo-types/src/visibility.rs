use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::Serialize;

/// What happened at a visibility event instant
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum VisibilityEventKind {
    /// The threshold condition first became satisfied
    Rise,
    /// The best observer-relative geometry within a pass
    Culmination,
    /// The threshold condition stopped being satisfied
    Set,
}

impl VisibilityEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            VisibilityEventKind::Rise => "Rise",
            VisibilityEventKind::Culmination => "Culmination",
            VisibilityEventKind::Set => "Set",
        }
    }
}

/// A moment when a moving object satisfies a geometric visibility or
/// proximity condition relative to a fixed observer
#[derive(Clone, Eq, PartialEq, Debug, Display, Serialize)]
#[display(fmt = "{{{} {} at {}}}", "subject", "kind.name()", "instant")]
pub struct VisibilityEvent {
    #[serde(rename = "eventTime")]
    pub instant: DateTime<Utc>,
    #[serde(rename = "subjectId")]
    pub subject: String,
    pub kind: VisibilityEventKind,
}
