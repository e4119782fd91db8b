//! The rewrite engine: builder, frozen rewriter, and the two passes.
//!
//! ```text
//! RewriterBuilder ──build()──> BottomUpRewriter<S, D>
//!   leaves()                     rewrite(&Tree<S>) -> Result<D, RewriteError>
//!   rules()                        1. label_tree   (label.rs)
//!   fallbacks()                    2. Reducer      (reduce.rs)
//! ```
//!
//! Registration only exists on the builder, which is consumed by `build`.
//! A built engine is immutable; every call allocates its own labels, so
//! concurrent calls on a shared engine never observe each other.

pub(crate) mod label;
pub(crate) mod reduce;

use crate::debug_view;
use crate::errors::RewriteError;
use crate::pattern::WildcardFactory;
use crate::registry::{Fallbacks, Leaves, RegistrationHook, Rules};
use crate::table::RuleTables;
use crate::tree::{
    KindComparer, NodeKind, RecursiveComparer, Tree, TreeComparer, ValueComparer,
};

use label::label_tree;
use reduce::{Reducer, Strict, UnmatchedPolicy};

pub use reduce::ReduceContext;

/// Collects leaves, rules and fallbacks before the engine is frozen.
pub struct RewriterBuilder<S: NodeKind, D> {
    pub(crate) tables: RuleTables<S, D>,
    pub(crate) factory: Box<dyn WildcardFactory<S>>,
    pub(crate) hook: Option<Box<dyn RegistrationHook<S>>>,
    comparer: Box<dyn KindComparer<S>>,
    tree_comparer: Box<dyn TreeComparer<S>>,
}

impl<S: NodeKind, D> RewriterBuilder<S, D> {
    /// A builder whose rule patterns mint wildcards with `factory`.
    pub fn new(factory: impl WildcardFactory<S> + 'static) -> Self {
        RewriterBuilder {
            tables: RuleTables::new(),
            factory: Box::new(factory),
            hook: None,
            comparer: Box::new(ValueComparer),
            tree_comparer: Box::new(RecursiveComparer),
        }
    }

    /// Replace the kind comparer used when matching patterns.
    #[must_use]
    pub fn with_comparer(mut self, comparer: impl KindComparer<S> + 'static) -> Self {
        self.comparer = Box::new(comparer);
        self
    }

    /// Replace the whole-tree comparer used when matching hole-free
    /// patterns.
    #[must_use]
    pub fn with_tree_comparer(mut self, comparer: impl TreeComparer<S> + 'static) -> Self {
        self.tree_comparer = Box::new(comparer);
        self
    }

    /// Observe every successful registration.
    #[must_use]
    pub fn with_hook(mut self, hook: impl RegistrationHook<S> + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn leaves(&mut self) -> Leaves<'_, S, D> {
        Leaves::new(self)
    }

    pub fn rules(&mut self) -> Rules<'_, S, D> {
        Rules::new(self)
    }

    pub fn fallbacks(&mut self) -> Fallbacks<'_, S, D> {
        Fallbacks::new(self)
    }

    /// Freeze the tables into a cross-grammar rewriter.
    pub fn build(self) -> BottomUpRewriter<S, D> {
        BottomUpRewriter {
            tables: self.tables,
            comparer: self.comparer,
            tree_comparer: self.tree_comparer,
        }
    }
}

/// A frozen rewriter from `Tree<S>` to `D`.
pub struct BottomUpRewriter<S: NodeKind, D> {
    tables: RuleTables<S, D>,
    comparer: Box<dyn KindComparer<S>>,
    tree_comparer: Box<dyn TreeComparer<S>>,
}

impl<S: NodeKind, D> BottomUpRewriter<S, D> {
    pub fn builder(factory: impl WildcardFactory<S> + 'static) -> RewriterBuilder<S, D> {
        RewriterBuilder::new(factory)
    }

    /// Rewrite `tree` into the target grammar.
    ///
    /// Fails with [`RewriteError::Irreducible`] if a node that has to be
    /// reduced matched no leaf, rule or fallback.
    pub fn rewrite(&self, tree: &Tree<S>) -> Result<D, RewriteError> {
        self.run(tree, &Strict)
    }

    /// Rendering of the registered tables, for diagnostics.
    pub fn debug_view(&self) -> String {
        debug_view::render(&self.tables)
    }

    pub(crate) fn run(
        &self,
        tree: &Tree<S>,
        unmatched: &dyn UnmatchedPolicy<S, D>,
    ) -> Result<D, RewriteError> {
        tracing::debug!(size = tree.size(), depth = tree.depth(), "rewriting tree");
        let labels = label_tree(&self.tables, &*self.comparer, &*self.tree_comparer, tree);
        Reducer::new(&self.tables, &labels, unmatched).reduce(labels.root())
    }
}
