#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::literal::Literal;
use std::fmt::Debug;

/// Hooks for an external proof/certificate writer.
///
/// Each hook fires exactly once per corresponding terminal outcome: the
/// empty-clause hook when the formula is found unsatisfiable at level 0,
/// the unit hook when a conflict yields a size-one clause.
pub trait ProofTracer<L: Literal>: Debug {
    fn trace_empty_clause(&mut self);
    fn trace_unit_clause(&mut self, lit: L);
}
