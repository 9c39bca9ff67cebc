pub extern crate nalgebra as na;

pub mod config;
pub mod congestion;
pub mod geodetic;
pub mod graph;
pub mod propagator;
pub mod store;
pub mod taxonomy;
pub mod units;
pub mod visibility;

/// The aggregated result of a skip-and-continue batch operation.
///
/// A single malformed or numerically failing record never aborts the
/// batch; it is recorded as skipped and excluded from the successes.
#[derive(Debug, Clone)]
pub struct BatchOutcome<T, E> {
    pub successes: Vec<T>,
    pub skipped: Vec<SkipReason<E>>,
}

impl<T, E> BatchOutcome<T, E> {
    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }
}

impl<T, E> Default for BatchOutcome<T, E> {
    fn default() -> Self {
        Self {
            successes: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Why one record was excluded from a batch result
#[derive(Debug, Clone)]
pub struct SkipReason<E> {
    pub name: String,
    pub error: E,
}
