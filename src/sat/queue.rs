#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The move-to-front decision queue.
//!
//! Variables live in a doubly-linked list realised as an index arena: one
//! [`Link`] per variable holding the indices of its neighbours, with no
//! pointers anywhere. Bumping a variable moves it to the preferred end
//! (`last`); decision code walks from `last` towards `first`, so recently
//! bumped variables are tried first. The `unassigned` cursor remembers
//! the best starting point for that walk and is advanced by bumping and
//! by backtracking.

use crate::sat::literal::Variable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Link {
    pub prev: Option<Variable>,
    pub next: Option<Variable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Queue {
    links: Vec<Link>,
    first: Option<Variable>,
    last: Option<Variable>,
    unassigned: Option<Variable>,
}

impl Queue {
    /// Builds the queue over variables `1..=num_vars` in index order, so
    /// the highest index starts at the preferred end.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        let mut queue = Self {
            links: vec![Link::default(); num_vars + 1],
            first: None,
            last: None,
            unassigned: None,
        };
        for var in 1..=num_vars as Variable {
            queue.enqueue(var);
        }
        queue.unassigned = queue.last;
        queue
    }

    #[must_use]
    pub fn first(&self) -> Option<Variable> {
        self.first
    }

    #[must_use]
    pub fn last(&self) -> Option<Variable> {
        self.last
    }

    /// The cursor to the most recently unassigned (or bumped-unassigned)
    /// variable; decision walks start here.
    #[must_use]
    pub fn unassigned(&self) -> Option<Variable> {
        self.unassigned
    }

    #[must_use]
    pub fn link(&self, var: Variable) -> Link {
        self.links[var as usize]
    }

    /// Whether `var` currently sits in the queue.
    #[must_use]
    pub fn contains(&self, var: Variable) -> bool {
        self.links[var as usize].prev.is_some() || self.first == Some(var)
    }

    /// Unlinks `var`, leaving both of its links empty.
    pub fn dequeue(&mut self, var: Variable) {
        let Link { prev, next } = self.links[var as usize];
        match prev {
            Some(p) => self.links[p as usize].next = next,
            None => self.first = next,
        }
        match next {
            Some(n) => self.links[n as usize].prev = prev,
            None => self.last = prev,
        }
        self.links[var as usize] = Link::default();
    }

    /// Links `var` at the preferred end.
    pub fn enqueue(&mut self, var: Variable) {
        self.links[var as usize] = Link {
            prev: self.last,
            next: None,
        };
        match self.last {
            Some(l) => self.links[l as usize].next = Some(var),
            None => self.first = Some(var),
        }
        self.last = Some(var);
    }

    /// Permanently removes `var`; it will be skipped by bumping from now
    /// on. The cursor retreats if it pointed here.
    pub fn remove(&mut self, var: Variable) {
        if self.unassigned == Some(var) {
            self.unassigned = self.links[var as usize].prev;
        }
        self.dequeue(var);
    }

    pub fn update_unassigned(&mut self, var: Variable) {
        self.unassigned = Some(var);
    }

    /// Queue order from `first` to `last`.
    pub fn iter(&self) -> impl Iterator<Item = Variable> + '_ {
        let mut cursor = self.first;
        core::iter::from_fn(move || {
            let var = cursor?;
            cursor = self.links[var as usize].next;
            Some(var)
        })
    }
}
