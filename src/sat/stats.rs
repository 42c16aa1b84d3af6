#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
/// Counters the engine maintains and the heuristics read.
///
/// `bumped` doubles as the variable bump-stamp generator and `stamped`
/// as the clause one: both only ever move forward, which is what makes
/// the recorded timestamps usable as a total recency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// Conflicts analysed.
    pub conflicts: u64,
    /// Total literals in learnt clauses, before minimisation.
    pub learned: u64,
    /// Learnt clauses of size one.
    pub units: u64,
    /// Learnt clauses of size two.
    pub binaries: u64,
    /// Variables permanently fixed at level 0.
    pub fixed: u64,
    /// Variable bumps performed; the last issued bump stamp.
    pub bumped: u64,
    /// Bumped variables that sat on the conflicting decision level.
    pub bumped_last: u64,
    /// Clause stamps issued.
    pub stamped: u64,
    /// Conflicts where the trail-weighted bump ordering was used.
    pub trail_bumped: u64,
    /// Assignments forced by propagation (maintained by `assign`).
    pub propagations: u64,
    /// Decisions taken (maintained by `decide`).
    pub decisions: u64,
}

/// `a / b`, or zero when `b` is zero.
#[must_use]
pub fn relative(a: u64, b: u64) -> f64 {
    if b == 0 { 0.0 } else { a as f64 / b as f64 }
}

/// `a` as a percentage of `b`, or zero when `b` is zero.
#[must_use]
pub fn percent(a: u64, b: u64) -> f64 {
    relative(100 * a, b)
}
