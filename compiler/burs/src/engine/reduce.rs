//! Top-down reduction.
//!
//! Starting at the root label, each node is reduced with its cheapest match:
//!
//! - **leaf / fallback**: the converter is called on the node. Converters
//!   registered with a [`ReduceContext`] may reduce children themselves;
//!   otherwise nothing below the node is visited.
//! - **rule**: the subtrees bound to the rule's holes are reduced first,
//!   through the labels computed during labeling, and handed to the goal.
//! - **no match**: delegated to the call's [`UnmatchedPolicy`]. The
//!   cross-grammar rewriter fails; the optimizer rebuilds the node from its
//!   reduced children.

use burs_stack::ensure_sufficient_stack;

use super::label::{LabelId, LabeledTree, Match, MatchSource};
use crate::errors::RewriteError;
use crate::table::{Goal, RuleId, RuleTables};
use crate::tree::{NodeKind, Tree};

/// What to do with a node that received no match.
pub(crate) trait UnmatchedPolicy<S: NodeKind, D> {
    fn reduce_unmatched(
        &self,
        reducer: &Reducer<'_, '_, S, D>,
        label: LabelId,
    ) -> Result<D, RewriteError>;
}

/// Unmatched nodes are errors.
pub(crate) struct Strict;

impl<S: NodeKind, D> UnmatchedPolicy<S, D> for Strict {
    fn reduce_unmatched(
        &self,
        reducer: &Reducer<'_, '_, S, D>,
        label: LabelId,
    ) -> Result<D, RewriteError> {
        let node = reducer.labels.get(label).node;
        tracing::debug!(kind = ?node.kind(), arity = node.arity(), "irreducible node");
        Err(RewriteError::irreducible(node))
    }
}

/// State of one reduction pass.
pub(crate) struct Reducer<'a, 't, S: NodeKind, D> {
    tables: &'a RuleTables<S, D>,
    labels: &'a LabeledTree<'t, S>,
    unmatched: &'a dyn UnmatchedPolicy<S, D>,
}

impl<'a, 't, S: NodeKind, D> Reducer<'a, 't, S, D> {
    pub(crate) fn new(
        tables: &'a RuleTables<S, D>,
        labels: &'a LabeledTree<'t, S>,
        unmatched: &'a dyn UnmatchedPolicy<S, D>,
    ) -> Self {
        Reducer {
            tables,
            labels,
            unmatched,
        }
    }

    #[inline]
    pub(crate) fn labels(&self) -> &'a LabeledTree<'t, S> {
        self.labels
    }

    /// Reduce the subtree labeled `id`.
    pub(crate) fn reduce(&self, id: LabelId) -> Result<D, RewriteError> {
        ensure_sufficient_stack(|| {
            let label = self.labels.get(id);
            let Some(selected) = label.best() else {
                return self.unmatched.reduce_unmatched(self, id);
            };
            tracing::trace!(
                kind = ?label.node.kind(),
                source = ?selected.source,
                cost = selected.cost,
                "reducing node",
            );

            match selected.source {
                MatchSource::Leaf(leaf) => {
                    (self.tables.leaf(leaf).convert)(&ReduceContext { reducer: self, label: id })
                }
                MatchSource::Fallback(fallback) => (self.tables.fallback(fallback).convert)(
                    &ReduceContext { reducer: self, label: id },
                ),
                MatchSource::Rule(rule) => self.apply_rule(rule, selected),
            }
        })
    }

    fn apply_rule(&self, rule: RuleId, selected: &Match) -> Result<D, RewriteError> {
        let hole = |i: usize| self.reduce(selected.bindings[i]);
        Ok(match &self.tables.rule(rule).goal {
            Goal::Nullary(goal) => goal(),
            Goal::Unary(goal) => goal(hole(0)?),
            Goal::Binary(goal) => {
                let a = hole(0)?;
                let b = hole(1)?;
                goal(a, b)
            }
            Goal::Ternary(goal) => {
                let a = hole(0)?;
                let b = hole(1)?;
                let c = hole(2)?;
                goal(a, b, c)
            }
        })
    }
}

/// Handle given to leaf and fallback converters registered with
/// `add_with`: the node being converted plus access to the labels of its
/// children.
pub struct ReduceContext<'r, S: NodeKind, D> {
    reducer: &'r Reducer<'r, 'r, S, D>,
    label: LabelId,
}

impl<'r, S: NodeKind, D> ReduceContext<'r, S, D> {
    /// The node being converted.
    pub fn node(&self) -> &'r Tree<S> {
        self.reducer.labels.get(self.label).node
    }

    /// Reduce child `index` with the matches found while labeling.
    pub fn reduce_child(&self, index: usize) -> Result<D, RewriteError> {
        let label = self.reducer.labels.get(self.label);
        match label.children.get(index) {
            Some(&child) => self.reducer.reduce(child),
            None => Err(RewriteError::MissingChild {
                index,
                arity: label.children.len(),
            }),
        }
    }

    /// Reduce every child, in order.
    pub fn reduce_children(&self) -> Result<Vec<D>, RewriteError> {
        self.reducer
            .labels
            .get(self.label)
            .children
            .iter()
            .map(|&child| self.reducer.reduce(child))
            .collect()
    }
}
