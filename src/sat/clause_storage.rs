#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
use crate::sat::literal::Literal;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::ops::{Index, IndexMut};
use std::slice::Iter;

/// Backing storage for the literals of a clause.
///
/// Clauses in this engine are short on average, so the default storage is
/// an inline `SmallVec`; `Vec` is available for uniformly long clauses.
pub trait LiteralStorage<L: Literal>:
    Index<usize, Output = L>
    + IndexMut<usize, Output = L>
    + FromIterator<L>
    + From<Vec<L>>
    + Extend<L>
    + AsRef<[L]>
    + AsMut<[L]>
    + Clone
    + Default
    + Debug
{
    fn push(&mut self, literal: L);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn iter(&self) -> Iter<L>;
    fn clear(&mut self);

    fn swap(&mut self, a: usize, b: usize) {
        self.as_mut().swap(a, b);
    }

    fn contains(&self, literal: L) -> bool {
        self.as_ref().contains(&literal)
    }
}

impl<L: Literal> LiteralStorage<L> for Vec<L> {
    fn push(&mut self, literal: L) {
        self.push(literal);
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn iter(&self) -> Iter<L> {
        self.as_slice().iter()
    }

    fn clear(&mut self) {
        self.clear();
    }
}

impl<L: Literal, const N: usize> LiteralStorage<L> for SmallVec<[L; N]> {
    fn push(&mut self, literal: L) {
        self.push(literal);
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }

    fn iter(&self) -> Iter<L> {
        self.as_slice().iter()
    }

    fn clear(&mut self) {
        self.clear();
    }
}
