#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The engine state: everything conflict analysis reads and writes,
//! owned by one struct and threaded explicitly.
//!
//! The surrounding solver drives this state through `decide`/`assign`
//! (normally from its propagation loop), hands detected conflicts to
//! [`analyse`](crate::sat::analyse), and reads back the updated
//! heuristics. One engine instance is one solver: nothing here is global
//! and nothing is shared.

use crate::sat::assignment::Assignment;
use crate::sat::averages::Averages;
use crate::sat::clause::Clause;
use crate::sat::clause_db::{ClauseDb, ClauseRef};
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::config::Config;
use crate::sat::flags::FlagStore;
use crate::sat::heap::VarHeap;
use crate::sat::literal::{DecisionLevel, Literal, PackedLiteral, Variable};
use crate::sat::minimise::{Minimiser, NoMinimiser};
use crate::sat::proof::ProofTracer;
use crate::sat::queue::Queue;
use crate::sat::stats::Stats;
use crate::sat::trail::{Reason, Trail};
use smallvec::SmallVec;

#[derive(Debug)]
pub struct Engine<
    L: Literal = PackedLiteral,
    S: LiteralStorage<L> = SmallVec<[L; 8]>,
    M: Minimiser<L> = NoMinimiser,
> {
    pub clause_db: ClauseDb<L, S>,

    pub assignment: Assignment,

    pub trail: Trail<L>,

    pub flags: FlagStore,

    pub queue: Queue,

    /// Last bump stamp per variable; stamps come from `stats.bumped`.
    pub btab: Vec<u64>,

    pub heap: VarHeap,

    /// Activity scores ranked by the heap, maintained externally.
    pub scores: Vec<f64>,

    pub averages: Averages,

    pub stats: Stats,

    pub config: Config,

    pub minimiser: M,

    pub proof: Option<Box<dyn ProofTracer<L>>>,

    /// Formula is known unsatisfiable (the empty clause was derived).
    pub unsat: bool,

    /// A unit was just learnt; status reporting is deferred until its
    /// propagation completes and `iterate` is called.
    pub iterating: bool,

    // Scratch state of one analysis pass; empty between conflicts.
    pub(crate) analysed: Vec<L>,
    pub(crate) levels: Vec<DecisionLevel>,
    pub(crate) resolved: Vec<ClauseRef>,
    pub(crate) clause: Vec<L>,
    pub(crate) conflict: Option<ClauseRef>,
}

impl<L: Literal, S: LiteralStorage<L>, M: Minimiser<L>> Engine<L, S, M> {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self::with_config(num_vars, Config::default())
    }

    #[must_use]
    pub fn with_config(num_vars: usize, config: Config) -> Self {
        let scores = vec![0.0; num_vars + 1];
        let mut heap = VarHeap::new(num_vars, config.heap_order);
        for var in 1..=num_vars as Variable {
            heap.push(var, &scores);
        }

        Self {
            clause_db: ClauseDb::new(),
            assignment: Assignment::new(num_vars),
            trail: Trail::new(num_vars),
            flags: FlagStore::new(num_vars),
            queue: Queue::new(num_vars),
            btab: vec![0; num_vars + 1],
            heap,
            scores,
            averages: Averages::default(),
            stats: Stats::default(),
            config,
            minimiser: M::default(),
            proof: None,
            unsat: false,
            iterating: false,
            analysed: Vec::new(),
            levels: Vec::new(),
            resolved: Vec::new(),
            clause: Vec::new(),
            conflict: None,
        }
    }

    /// Registers an original clause and returns its reference.
    pub fn add_original(&mut self, literals: &[i32]) -> ClauseRef {
        debug_assert!(!literals.is_empty());
        self.clause_db.add_original(Clause::from_i32s(literals))
    }

    #[must_use]
    pub fn score(&self, var: Variable) -> f64 {
        self.scores[var as usize]
    }

    pub fn set_score(&mut self, var: Variable, score: f64) {
        self.scores[var as usize] = score;
        self.heap.update(var, &self.scores);
    }

    /// Installs an assignment at the current decision level.
    pub fn assign(&mut self, lit: L, reason: Reason) {
        debug_assert!(!self.assignment.is_assigned(lit.variable()));
        self.assignment.assign(lit);
        self.trail.push(lit, reason);
        if matches!(reason, Reason::Long(_)) {
            self.stats.propagations += 1;
        }
        log::trace!(
            "assign {} at level {} ({reason:?})",
            lit.to_i32(),
            self.trail.level()
        );
    }

    /// Opens a new decision level with `lit` as its decision.
    pub fn decide(&mut self, lit: L) {
        self.trail.new_level();
        self.stats.decisions += 1;
        self.assign(lit, Reason::Decision);
    }

    /// Installs the asserting literal of a freshly learnt clause.
    pub fn assign_driving(&mut self, lit: L, cref: ClauseRef) {
        debug_assert!(self.clause_db[cref].literals.contains(lit));
        self.assign(lit, Reason::Long(cref));
    }

    /// Installs a permanent fact; only legal on level 0.
    pub fn assign_unit(&mut self, lit: L) {
        debug_assert_eq!(self.trail.level(), 0);
        self.assign(lit, Reason::Unit);
    }

    /// Undoes every assignment above `level`.
    ///
    /// Each unassigned variable re-enters the activity heap and, when it
    /// carries the freshest bump stamp so far, takes over the queue's
    /// unassigned cursor.
    pub fn backtrack(&mut self, level: DecisionLevel) {
        debug_assert!(level <= self.trail.level());
        if level == self.trail.level() {
            return;
        }
        log::debug!("backtracking to level {level} from {}", self.trail.level());

        let start = self.trail.start_above(level);
        while self.trail.len() > start {
            let Some(lit) = self.trail.pop() else {
                unreachable!("trail shorter than its control stack claims")
            };
            let var = lit.variable();
            self.assignment.unassign(var);

            if self.queue.contains(var) {
                let cursor_stamp = self
                    .queue
                    .unassigned()
                    .map_or(0, |u| self.btab[u as usize]);
                if self.btab[var as usize] >= cursor_stamp {
                    self.queue.update_unassigned(var);
                }
            }
            self.heap.push(var, &self.scores);
        }
        self.trail.truncate_control(level);
    }

    /// Acknowledges a learnt unit after its propagation completed,
    /// re-enabling status reporting.
    pub fn iterate(&mut self) {
        debug_assert!(self.iterating);
        self.iterating = false;
        log::debug!("unit round complete, reporting resumes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;

    type TestEngine = Engine<PackedLiteral>;

    fn lit(l: i32) -> PackedLiteral {
        PackedLiteral::from_i32(l)
    }

    #[test]
    fn test_new_sizes() {
        let engine = TestEngine::new(5);
        assert_eq!(engine.assignment.len(), 6);
        assert_eq!(engine.btab.len(), 6);
        assert_eq!(engine.heap.len(), 5);
        assert_eq!(engine.trail.level(), 0);
        assert!(!engine.unsat);
    }

    #[test]
    fn test_decide_and_backtrack() {
        let mut engine = TestEngine::new(4);
        let c = engine.add_original(&[-1, 2]);

        engine.decide(lit(1));
        engine.assign(lit(2), Reason::Long(c));
        engine.decide(lit(3));

        assert_eq!(engine.trail.level(), 2);
        assert_eq!(engine.stats.decisions, 2);
        assert_eq!(engine.stats.propagations, 1);
        assert!(engine.assignment.is_assigned(3));

        engine.backtrack(1);
        assert_eq!(engine.trail.level(), 1);
        assert!(!engine.assignment.is_assigned(3));
        assert!(engine.assignment.is_assigned(2));
        // Unassigned variable is available on the heap again.
        assert!(engine.heap.contains(3));

        engine.backtrack(0);
        assert_eq!(engine.trail.len(), 0);
    }

    #[test]
    fn test_backtrack_to_current_level_is_noop() {
        let mut engine = TestEngine::new(2);
        engine.decide(lit(1));
        engine.backtrack(1);
        assert_eq!(engine.trail.level(), 1);
        assert!(engine.assignment.is_assigned(1));
    }

    #[test]
    fn test_backtrack_moves_queue_cursor() {
        let mut engine = TestEngine::new(3);
        // Give variable 1 the freshest stamp by hand.
        engine.stats.bumped = 1;
        engine.btab[1] = 1;

        engine.decide(lit(1));
        engine.decide(lit(2));
        engine.backtrack(0);

        assert_eq!(engine.queue.unassigned(), Some(1));
    }

    #[test]
    fn test_set_score_reorders_heap() {
        let mut engine = TestEngine::new(3);
        engine.set_score(2, 4.0);
        assert_eq!(engine.score(2), 4.0);
        assert_eq!(engine.heap.pop(&engine.scores), Some(2));
    }
}
