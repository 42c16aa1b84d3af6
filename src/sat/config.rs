#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::heap::HeapOrder;

/// Engine options, fixed for the lifetime of one engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Enables the trail-weighted variable bump ordering. Even when
    /// enabled it only activates while both thresholds below are
    /// exceeded, re-evaluated at every conflict.
    pub trail_bump: bool,
    /// Propagations-per-decision ratio above which trail-weighted
    /// bumping may activate.
    pub trail_bump_props: f64,
    /// Percentage of all-time bumps that landed on the conflicting
    /// level above which trail-weighted bumping may activate.
    pub trail_bump_last: f64,
    /// Enables learned-clause minimisation.
    pub minimise: bool,
    /// Ranking strategy for the activity heap.
    pub heap_order: HeapOrder,
    /// Redundant clauses at most this long and with glue at most
    /// `keep_glue` are kept unconditionally and never stamped.
    pub keep_size: usize,
    pub keep_glue: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trail_bump: true,
            trail_bump_props: 100.0,
            trail_bump_last: 50.0,
            minimise: true,
            heap_order: HeapOrder::Search,
            keep_size: 3,
            keep_glue: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.trail_bump);
        assert!(config.minimise);
        assert_eq!(config.heap_order, HeapOrder::Search);
        assert_eq!(config.keep_glue, 2);
    }
}
