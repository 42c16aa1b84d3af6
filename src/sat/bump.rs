#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Bumping: reordering the decision queue and stamping resolved clauses
//! after each conflict.
//!
//! Variables gathered during analysis move to the front of the
//! move-to-front queue so that the next decisions prefer them. Two
//! orderings govern in which sequence they are bumped. The default sorts
//! by the existing bump stamps, preserving the relative queue order of
//! already-bumped variables. Some instances propagate enormously per
//! decision while most bumps land on the conflicting level; on those the
//! trail-weighted ordering, which folds the assignment order into the
//! sort key, is more robust. The switch between the two is a pure
//! function of the current counter ratios and is re-evaluated at every
//! conflict.
//!
//! Resolved redundant clauses get an analogous move-to-front treatment
//! through their activity stamps.

use crate::sat::clause_storage::LiteralStorage;
use crate::sat::config::Config;
use crate::sat::engine::Engine;
use crate::sat::literal::{Literal, Variable};
use crate::sat::minimise::Minimiser;
use crate::sat::stats::{percent, relative};

/// Whether the trail-weighted bump ordering applies for the given
/// propagations-per-decision ratio and bumped-at-conflict-level
/// percentage. Stateless; both statistics are recomputed per conflict.
#[must_use]
pub fn wants_trail_order(config: &Config, props_per_decision: f64, bumped_last_percent: f64) -> bool {
    config.trail_bump
        && props_per_decision > config.trail_bump_props
        && bumped_last_percent > config.trail_bump_last
}

impl<L: Literal, S: LiteralStorage<L>, M: Minimiser<L>> Engine<L, S, M> {
    fn trail_order_wanted(&self) -> bool {
        wants_trail_order(
            &self.config,
            relative(self.stats.propagations, self.stats.decisions),
            percent(self.stats.bumped_last, self.stats.bumped),
        )
    }

    /// Bumps every variable gathered in the analysed set, in the order
    /// selected by the active policy.
    pub(crate) fn bump_variables(&mut self) {
        if self.trail_order_wanted() {
            let Self {
                analysed,
                btab,
                trail,
                ..
            } = self;
            analysed.sort_unstable_by_key(|l| {
                let var = l.variable();
                let pos = trail.var(var).pos.map_or(0, u64::from);
                (btab[var as usize].saturating_add(pos), pos)
            });
            self.stats.trail_bumped += 1;
        } else {
            let Self { analysed, btab, .. } = self;
            analysed.sort_by_key(|l| btab[l.variable() as usize]);
        }

        let analysed = std::mem::take(&mut self.analysed);
        for lit in &analysed {
            self.bump_variable(lit.variable());
        }
        self.analysed = analysed;
    }

    /// Moves `var` to the front of the queue and gives it a fresh stamp.
    /// Skipped when the variable has no successor link: it is either
    /// already at the front or was permanently removed from the queue.
    fn bump_variable(&mut self, var: Variable) {
        if self.queue.link(var).next.is_none() {
            return;
        }
        self.queue.dequeue(var);
        self.queue.enqueue(var);
        self.stats.bumped += 1;
        self.btab[var as usize] = self.stats.bumped;
        if self.trail.var(var).level == self.trail.level() {
            self.stats.bumped_last += 1;
        }
        log::trace!("moved to front and bumped {var} ({})", self.stats.bumped);
        if !self.assignment.is_assigned(var) {
            self.queue.update_unassigned(var);
        }
    }

    /// Stamps every clause gathered in the resolved set, preserving the
    /// relative order of previously stamped clauses, and clears the set.
    pub(crate) fn bump_resolved_clauses(&mut self) {
        let mut resolved = std::mem::take(&mut self.resolved);
        resolved.sort_by_key(|&cref| self.clause_db[cref].stamp);
        for &cref in &resolved {
            self.stats.stamped += 1;
            self.clause_db[cref].stamp = self.stats.stamped;
            log::trace!("bumped clause {cref} ({})", self.stats.stamped);
        }
        resolved.clear();
        self.resolved = resolved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::literal::PackedLiteral;
    use crate::sat::trail::Reason;
    use itertools::Itertools;

    type TestEngine = Engine<PackedLiteral>;

    fn lit(l: i32) -> PackedLiteral {
        PackedLiteral::from_i32(l)
    }

    #[test]
    fn test_policy_predicate() {
        let config = Config::default();
        assert!(!wants_trail_order(&config, 50.0, 80.0));
        assert!(!wants_trail_order(&config, 500.0, 10.0));
        assert!(wants_trail_order(&config, 500.0, 80.0));

        let disabled = Config {
            trail_bump: false,
            ..Config::default()
        };
        assert!(!wants_trail_order(&disabled, 500.0, 80.0));
    }

    #[test]
    fn test_bump_moves_to_front() {
        let mut engine = TestEngine::new(4);
        engine.decide(lit(2));

        engine.analysed.push(lit(-2));
        engine.bump_variables();

        assert_eq!(engine.queue.iter().collect_vec(), vec![1, 3, 4, 2]);
        assert_eq!(engine.btab[2], 1);
        assert_eq!(engine.stats.bumped, 1);
        // The bumped variable sits on the conflicting level.
        assert_eq!(engine.stats.bumped_last, 1);
    }

    #[test]
    fn test_bump_skips_front_and_removed() {
        let mut engine = TestEngine::new(3);
        engine.queue.remove(2);
        engine.decide(lit(2));
        engine.decide(lit(3));

        // Variable 3 is already at the front, variable 2 was removed.
        engine.analysed.push(lit(-3));
        engine.analysed.push(lit(-2));
        engine.bump_variables();

        assert_eq!(engine.queue.iter().collect_vec(), vec![1, 3]);
        assert_eq!(engine.stats.bumped, 0);
        assert_eq!(engine.btab[2], 0);
        assert_eq!(engine.btab[3], 0);
    }

    #[test]
    fn test_recency_order_preserved() {
        let mut engine = TestEngine::new(4);
        engine.decide(lit(1));
        engine.assign(lit(2), Reason::Decision);
        engine.assign(lit(3), Reason::Decision);

        // Pre-existing stamps: 3 bumped before 2.
        engine.stats.bumped = 2;
        engine.btab[3] = 1;
        engine.btab[2] = 2;

        engine.analysed.push(lit(2));
        engine.analysed.push(lit(3));
        engine.analysed.push(lit(1));
        engine.bump_variables();

        // Unbumped 1 first, then 3 and 2 in their existing stamp order.
        assert_eq!(engine.btab[1], 3);
        assert_eq!(engine.btab[3], 4);
        assert_eq!(engine.btab[2], 5);
        assert_eq!(engine.queue.iter().collect_vec(), vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_trail_weighted_order() {
        let config = Config {
            trail_bump_props: 0.0,
            trail_bump_last: 0.0,
            ..Config::default()
        };
        let mut engine = TestEngine::with_config(4, config);
        engine.decide(lit(3));
        engine.assign(lit(1), Reason::Decision);
        engine.assign(lit(2), Reason::Decision);

        // Make both activation ratios non-zero.
        engine.stats.propagations = 10;
        engine.stats.decisions = 1;
        engine.stats.bumped = 5;
        engine.stats.bumped_last = 1;
        // Stamp + trail sums: 3 -> 5+0, 1 -> 0+1, 2 -> 0+2.
        engine.btab[3] = 5;

        engine.analysed.push(lit(3));
        engine.analysed.push(lit(2));
        engine.analysed.push(lit(1));
        engine.bump_variables();

        assert_eq!(engine.stats.trail_bumped, 1);
        // Bump order 1, 2, 3: later bumps end nearer the front.
        assert!(engine.btab[1] < engine.btab[2]);
        assert!(engine.btab[2] < engine.btab[3]);
        assert_eq!(engine.queue.iter().collect_vec(), vec![4, 1, 2, 3]);
    }

    /// Bumping a variable that is currently unassigned advances the
    /// queue's unassigned cursor to it.
    #[test]
    fn test_bump_unassigned_updates_cursor() {
        let mut engine = TestEngine::new(4);
        engine.decide(lit(4));

        engine.analysed.push(lit(2));
        engine.bump_variables();

        assert_eq!(engine.queue.unassigned(), Some(2));
        assert_eq!(engine.queue.last(), Some(2));
    }

    #[test]
    fn test_variable_stamps_monotonic() {
        let mut engine = TestEngine::new(6);
        engine.decide(lit(1));
        engine.assign(lit(2), Reason::Decision);
        engine.assign(lit(5), Reason::Decision);

        let mut last = 0;
        for round in 0u64..3 {
            engine.analysed.push(lit(1));
            engine.analysed.push(lit(2));
            engine.analysed.push(lit(5));
            engine.bump_variables();
            for var in [1, 2, 5] {
                assert!(engine.btab[var] > last || engine.btab[var] == 0);
            }
            last = engine.stats.bumped;
            assert!(last > u64::from(round));
        }
    }

    #[test]
    fn test_clause_stamps_monotonic_and_order_preserving() {
        let mut engine = TestEngine::new(2);
        let a = engine.clause_db.add_learnt(&[lit(1), lit(2)], 9);
        let b = engine.clause_db.add_learnt(&[lit(-1), lit(2)], 9);
        let c = engine.clause_db.add_learnt(&[lit(1), lit(-2)], 9);

        engine.clause_db[b].stamp = 1;
        engine.clause_db[a].stamp = 2;
        engine.stats.stamped = 2;

        engine.resolved.extend([a, b, c]);
        engine.bump_resolved_clauses();

        // Never-stamped c first, then b and a keep their relative order.
        assert_eq!(engine.clause_db[c].stamp, 3);
        assert_eq!(engine.clause_db[b].stamp, 4);
        assert_eq!(engine.clause_db[a].stamp, 5);
        assert!(engine.resolved.is_empty());
    }
}
