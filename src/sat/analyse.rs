#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Conflict analysis: derive the first-UIP clause from a falsified
//! clause, decide how far to backjump, and install the flipped literal.
//!
//! The walker works backwards over the implication graph. Resolving a
//! clause marks its unseen literals: a literal on a lower level joins the
//! learnt clause, a literal on the conflicting level joins the open
//! frontier, a literal forced at level 0 is dropped. The trail is then
//! scanned backwards for the next frontier literal; when only one is
//! open, that literal is the first unique implication point and its
//! negation completes the clause.
//!
//! A side effect of the walk is the bump candidate data the decision
//! heuristics feed on, applied afterwards by the bumping pass.

use crate::sat::clause_db::ClauseRef;
use crate::sat::clause_storage::LiteralStorage;
use crate::sat::engine::Engine;
use crate::sat::flags::Status;
use crate::sat::literal::{DecisionLevel, Literal};
use crate::sat::minimise::Minimiser;
use crate::sat::trail::Reason;
use std::cmp::Reverse;

/// Outcome of one analysis pass, for reporting and restart policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Learnt<L: Literal> {
    /// The empty clause: the formula is unsatisfiable.
    Empty,
    /// A unit clause; its literal is now a permanent fact.
    Unit(L),
    /// An asserting clause driving the search onwards.
    Driving {
        cref: ClauseRef,
        literal: L,
        jump: DecisionLevel,
        glue: u32,
    },
}

impl<L: Literal, S: LiteralStorage<L>, M: Minimiser<L>> Engine<L, S, M> {
    /// Analyses `conflict`, a clause falsified by the current trail.
    ///
    /// On return the trail has been backjumped, the asserting literal
    /// installed (unless the empty clause was derived), the decision
    /// heuristics updated, and all scratch state cleared.
    pub fn analyse(&mut self, conflict: ClauseRef) -> Learnt<L> {
        debug_assert!(self.conflict.is_none());
        debug_assert!(!self.unsat);
        self.conflict = Some(conflict);
        self.stats.conflicts += 1;
        log::debug!(
            "analysing conflict {conflict} at level {}",
            self.trail.level()
        );

        if self.trail.level() == 0 {
            self.learn_empty_clause();
            return Learnt::Empty;
        }

        debug_assert!(self.analysed.is_empty());
        debug_assert!(self.levels.is_empty());
        debug_assert!(self.resolved.is_empty());
        debug_assert!(self.clause.is_empty());

        // Derive the first UIP clause.
        let mut open: u32 = 0;
        let mut reason = conflict;
        let mut pivot: Option<L> = None;
        let mut i = self.trail.len();
        let uip = loop {
            self.analyse_reason(pivot, reason, &mut open);
            let lit = loop {
                debug_assert!(i > 0, "frontier exhausted before the UIP");
                i -= 1;
                let lit = self.trail.lit(i);
                if self.flags[lit.variable()].seen {
                    break lit;
                }
            };
            open -= 1;
            if open == 0 {
                break lit;
            }
            pivot = Some(lit);
            reason = match self.trail.var(lit.variable()).reason {
                Reason::Long(cref) => cref,
                Reason::Decision | Reason::Unit => {
                    unreachable!("open frontier literal has no reason clause")
                }
            };
        };
        log::debug!("first UIP {}", uip.to_i32());
        self.clause.push(uip.negated());
        self.check_learned_clause();

        self.bump_resolved_clauses();

        // |levels| is the glue (LBD) of the derived clause.
        let glue = self.levels.len() as u32;
        self.averages.glue_fast.update(f64::from(glue));
        self.averages.glue_slow.update(f64::from(glue));
        log::debug!(
            "first UIP clause of size {} and glue {glue}",
            self.clause.len()
        );

        let mut size = self.clause.len();
        self.stats.learned += size as u64;

        if size > 1 && self.config.minimise {
            let Self {
                minimiser,
                clause,
                trail,
                flags,
                ..
            } = self;
            minimiser.minimise(clause, trail, flags);
            debug_assert!(self.clause.len() <= size);
            debug_assert!(self.clause.contains(uip.negated()));
            size = self.clause.len();
        }

        self.stats.units += u64::from(size == 1);
        self.stats.binaries += u64::from(size == 2);
        self.averages.size.update(size as f64);

        self.bump_variables();

        // Determine the backjump level, backtrack and assign the flipped
        // literal.
        let learnt = if size > 1 {
            let Self { clause, trail, .. } = self;
            clause.sort_unstable_by_key(|l| Reverse(trail.var(l.variable()).pos));
            debug_assert_eq!(self.clause[0], uip.negated());

            let cref = self.clause_db.add_learnt(&self.clause, glue);
            let jump = self.trail.var(self.clause[1].variable()).level;
            self.averages.jump.update(f64::from(jump));
            self.backtrack(jump);
            self.assign_driving(uip.negated(), cref);
            Learnt::Driving {
                cref,
                literal: uip.negated(),
                jump,
                glue,
            }
        } else {
            self.iterating = true;
            self.averages.jump.update(0.0);
            self.backtrack(0);
            self.learn_unit_clause(uip.negated());
            self.assign_unit(uip.negated());
            Learnt::Unit(uip.negated())
        };

        // Clean up: restore the between-conflicts invariants.
        self.clear_seen();
        self.clause.clear();
        self.clear_levels();
        self.conflict = None;
        learnt
    }

    /// Resolves `reason` into the frontier, skipping the pivot literal.
    fn analyse_reason(&mut self, pivot: Option<L>, reason: ClauseRef, open: &mut u32) {
        self.save_as_resolved(reason);
        for idx in 0..self.clause_db[reason].len() {
            let other = self.clause_db[reason][idx];
            if Some(other) != pivot {
                self.analyse_literal(other, open);
            }
        }
    }

    /// Classifies one literal reached by resolution: dropped when fixed
    /// at level 0, appended to the learnt clause when on a lower level,
    /// opened as frontier when on the conflicting level.
    fn analyse_literal(&mut self, lit: L, open: &mut u32) {
        let var = lit.variable();
        if self.flags[var].seen {
            return;
        }
        let level = self.trail.var(var).level;
        if level == 0 {
            return;
        }
        debug_assert_eq!(self.assignment.literal_value(lit), Some(false));

        let current = self.trail.level();
        if level < current {
            self.clause.push(lit);

            let pos = self.trail.var(var).pos.map_or(usize::MAX, |p| p as usize);
            let entry = self.trail.control_mut(level);
            if entry.seen == 0 {
                log::trace!("level {level} contributes to conflict");
                self.levels.push(level);
            }
            entry.seen += 1;
            if pos < entry.trail {
                entry.trail = pos;
            }
        } else {
            *open += 1;
        }

        self.flags[var].seen = true;
        self.analysed.push(lit);
        log::trace!("analysed literal {} assigned at level {level}", lit.to_i32());
    }

    /// Records a resolved clause for the clause-bumping pass. Redundant
    /// clauses are marked used; only stamp-eligible ones become bump
    /// candidates, the rest survive reduction by policy anyway.
    fn save_as_resolved(&mut self, cref: ClauseRef) {
        let (keep_size, keep_glue) = (self.config.keep_size, self.config.keep_glue);
        let clause = &mut self.clause_db[cref];
        if clause.hbr {
            clause.used = true;
        }
        if !clause.redundant {
            return;
        }
        clause.used = true;
        if !clause.stamp_eligible(keep_size, keep_glue) {
            return;
        }
        self.resolved.push(cref);
    }

    /// Terminal outcome: the formula is unsatisfiable.
    fn learn_empty_clause(&mut self) {
        debug_assert!(!self.unsat);
        log::debug!("learned the empty clause");
        if let Some(proof) = self.proof.as_mut() {
            proof.trace_empty_clause();
        }
        self.unsat = true;
    }

    /// A unit was derived: fix its variable permanently.
    fn learn_unit_clause(&mut self, lit: L) {
        log::debug!("learned unit clause {}", lit.to_i32());
        if let Some(proof) = self.proof.as_mut() {
            proof.trace_unit_clause(lit);
        }
        debug_assert_eq!(self.flags[lit.variable()].status, Status::Active);
        self.flags[lit.variable()].status = Status::Fixed;
        self.stats.fixed += 1;
    }

    fn clear_seen(&mut self) {
        while let Some(lit) = self.analysed.pop() {
            let flags = &mut self.flags[lit.variable()];
            debug_assert!(flags.seen);
            flags.seen = false;
            debug_assert!(!flags.keep);
            debug_assert!(!flags.poison);
            debug_assert!(!flags.removable);
        }
    }

    fn clear_levels(&mut self) {
        while let Some(level) = self.levels.pop() {
            // Entries above the backjump level were already discarded.
            if level <= self.trail.level() {
                self.trail.control_mut(level).reset();
            }
        }
    }

    /// Invariant check: the derived clause is falsified by the trail and
    /// asserts exactly one literal on the conflicting level.
    fn check_learned_clause(&self) {
        #[cfg(debug_assertions)]
        {
            use rustc_hash::FxHashSet;

            let mut vars = FxHashSet::default();
            let mut at_current = 0;
            for &lit in &self.clause {
                assert!(
                    vars.insert(lit.variable()),
                    "duplicate variable in learned clause"
                );
                assert_eq!(self.assignment.literal_value(lit), Some(false));
                let level = self.trail.var(lit.variable()).level;
                assert!(level > 0, "fixed literal in learned clause");
                if level == self.trail.level() {
                    at_current += 1;
                }
            }
            assert_eq!(at_current, 1, "learned clause must be asserting");
        }
    }
}
