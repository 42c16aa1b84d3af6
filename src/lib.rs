//! The conflict-analysis and clause-learning engine of a CDCL SAT solver.
//!
//! Given a clause falsified by the current assignment trail, the engine
//! walks the implication graph backwards to derive the first-UIP learnt
//! clause, decides how far to backjump, installs the asserting literal,
//! and updates the variable and clause activity heuristics that steer
//! future decisions.
//!
//! Propagation, clause minimisation, restarts and database reduction are
//! collaborators of this crate, not part of it: they drive the
//! [`Engine`](sat::engine::Engine) through its public operations and
//! consume the heuristic state it maintains.
//!
//! ```
//! use sat_learner::sat::engine::Engine;
//! use sat_learner::sat::analyse::Learnt;
//! use sat_learner::sat::literal::{Literal, PackedLiteral};
//! use sat_learner::sat::trail::Reason;
//!
//! let mut engine: Engine<PackedLiteral> = Engine::new(3);
//! let reason = engine.add_original(&[-1, 2]);
//! let conflict = engine.add_original(&[-1, -2]);
//!
//! engine.decide(PackedLiteral::from_i32(1));
//! engine.assign(PackedLiteral::from_i32(2), Reason::Long(reason));
//!
//! // Propagation found (-1, -2) falsified: analyse it.
//! let learnt = engine.analyse(conflict);
//! assert_eq!(learnt, Learnt::Unit(PackedLiteral::from_i32(-1)));
//! ```

pub mod sat;
