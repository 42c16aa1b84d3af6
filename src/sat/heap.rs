#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A binary heap of variables ranked by an external activity score.
//!
//! The scores live outside the heap (they are maintained by the decay
//! and rescoring machinery of the surrounding solver) and are passed
//! into every operation as a slice. Two ranking strategies exist: one
//! consulted when picking decisions and one used while scheduling
//! propagation. Both prefer the greater score; they differ only in the
//! deterministic index tie-break, which keeps heap behaviour
//! reproducible for identical score sequences.

use crate::sat::literal::Variable;
use clap::ValueEnum;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt::Display;

/// Ranking strategy, chosen when the heap is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum HeapOrder {
    /// Decision-time ranking: ties fall to the smaller variable index.
    #[default]
    Search,
    /// Propagation-scheduling ranking: ties fall to the larger index.
    Propagation,
}

impl Display for HeapOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Propagation => write!(f, "propagation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarHeap {
    order: HeapOrder,
    heap: Vec<Variable>,
    pos: Vec<Option<u32>>,
}

impl VarHeap {
    #[must_use]
    pub fn new(num_vars: usize, order: HeapOrder) -> Self {
        Self {
            order,
            heap: Vec::with_capacity(num_vars),
            pos: vec![None; num_vars + 1],
        }
    }

    #[must_use]
    pub const fn order(&self) -> HeapOrder {
        self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn contains(&self, var: Variable) -> bool {
        self.pos[var as usize].is_some()
    }

    /// Strict weak order: does `a` rank strictly above `b`?
    #[must_use]
    fn before(&self, a: Variable, b: Variable, scores: &[f64]) -> bool {
        let sa = OrderedFloat(scores[a as usize]);
        let sb = OrderedFloat(scores[b as usize]);
        match sa.cmp(&sb) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.order {
                HeapOrder::Search => a < b,
                HeapOrder::Propagation => a > b,
            },
        }
    }

    pub fn push(&mut self, var: Variable, scores: &[f64]) {
        if self.contains(var) {
            return;
        }
        let i = self.heap.len();
        self.heap.push(var);
        self.pos[var as usize] = Some(i as u32);
        self.sift_up(i, scores);
    }

    pub fn pop(&mut self, scores: &[f64]) -> Option<Variable> {
        let top = *self.heap.first()?;
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        self.pos[self.heap[0] as usize] = Some(0);
        self.heap.pop();
        self.pos[top as usize] = None;
        if !self.heap.is_empty() {
            self.sift_down(0, scores);
        }
        Some(top)
    }

    /// Restores the heap property around `var` after its score changed.
    pub fn update(&mut self, var: Variable, scores: &[f64]) {
        if let Some(i) = self.pos[var as usize] {
            self.sift_up(i as usize, scores);
            if let Some(i) = self.pos[var as usize] {
                self.sift_down(i as usize, scores);
            }
        }
    }

    /// Re-establishes the heap property over all members, for use after
    /// a bulk rescore.
    pub fn rebuild(&mut self, scores: &[f64]) {
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i, scores);
        }
    }

    pub fn clear(&mut self) {
        for &var in &self.heap {
            self.pos[var as usize] = None;
        }
        self.heap.clear();
    }

    fn swap_entries(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos[self.heap[i] as usize] = Some(i as u32);
        self.pos[self.heap[j] as usize] = Some(j as u32);
    }

    fn sift_up(&mut self, mut i: usize, scores: &[f64]) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.before(self.heap[i], self.heap[parent], scores) {
                self.swap_entries(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize, scores: &[f64]) {
        loop {
            let mut best = i;
            for child in [2 * i + 1, 2 * i + 2] {
                if child < self.heap.len()
                    && self.before(self.heap[child], self.heap[best], scores)
                {
                    best = child;
                }
            }
            if best == i {
                break;
            }
            self.swap_entries(i, best);
            i = best;
        }
    }
}
