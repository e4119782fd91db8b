//! Bottom-up rewrite system (BURS).
//!
//! Converts a labeled tree of one grammar into a tree of another (possibly
//! the same) grammar. Among all registered conversions that apply to a node,
//! the cheapest is selected, with registration order breaking ties. This is
//! the instruction-selection algorithm of `iburg`-style code generators, with
//! rule patterns written as ordinary closures over source trees instead of a
//! grammar file.
//!
//! # Pipeline
//!
//! ```text
//! build time                               call time
//! ──────────                               ─────────
//! leaves / rules / fallbacks               input tree
//!        │                                      │
//!        │ pattern compile (pattern)            │ label      (engine::label)
//!        │ shape index     (index)              │  - post-order
//!        v                                      │  - leaves, rules, fallback
//! RewriterBuilder::build ──> frozen tables ─────┤
//!                                               │ reduce     (engine::reduce)
//!                                               │  - cheapest match per node
//!                                               │  - goals over reduced holes
//!                                               v
//!                                          output tree
//! ```
//!
//! # Entry points
//!
//! - [`BottomUpRewriter`]: source and target grammars differ. A node no
//!   conversion applies to is a [`RewriteError::Irreducible`].
//! - [`BottomUpOptimizer`]: source and target coincide. A node no conversion
//!   applies to keeps its kind and has its children optimized instead.
//!
//! Both are configured through a [`RewriterBuilder`] and are immutable once
//! built, so a configured engine can be shared between threads.
//!
//! # Example
//!
//! ```
//! use burs::{BottomUpOptimizer, HoleId, NodeKind, Tree, WildcardFactory};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Op { Num(i64), Add, Hole(HoleId) }
//!
//! impl NodeKind for Op {
//!     type Tag = u8;
//!     fn tag(&self) -> u8 {
//!         match self { Op::Num(_) => 0, Op::Add => 1, Op::Hole(_) => 2 }
//!     }
//! }
//!
//! struct Holes;
//! impl WildcardFactory<Op> for Holes {
//!     fn create_wildcard(&self, hole: HoleId) -> Op { Op::Hole(hole) }
//!     fn hole_of(&self, kind: &Op) -> Option<HoleId> {
//!         if let Op::Hole(hole) = kind { Some(*hole) } else { None }
//!     }
//! }
//!
//! let num = |n: i64| Tree::leaf(Op::Num(n));
//! let add = |a: Tree<Op>, b: Tree<Op>| Tree::new(Op::Add, [a, b]);
//!
//! let mut builder = BottomUpOptimizer::builder(Holes);
//! builder.rules().add1(|x| add(x, num(0)), |x| x, 0)?;
//! let optimizer = builder.build_optimizer();
//!
//! assert_eq!(optimizer.optimize(&add(num(42), num(0)))?, num(42));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod debug_view;
mod engine;
mod errors;
mod index;
mod matcher;
mod nary_map;
mod optimizer;
pub mod pattern;
mod registry;
mod table;
mod tree;

#[cfg(test)]
mod test_helpers;

pub use engine::{BottomUpRewriter, ReduceContext, RewriterBuilder};
pub use errors::{ConfigError, NAryMapError, RewriteError};
pub use nary_map::NAryMap;
pub use optimizer::{BottomUpOptimizer, OptimizerBuilder};
pub use pattern::{HoleId, Pattern, WildcardFactory};
pub use registry::{Fallbacks, Leaves, RegistrationHook, Rules};
pub use table::Cost;
pub use tree::{
    KindComparer, NodeKind, RecursiveComparer, Shape, Tree, TreeComparer, ValueComparer,
};
