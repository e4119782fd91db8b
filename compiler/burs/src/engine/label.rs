//! Bottom-up labeling.
//!
//! Visits the input tree in post-order and records, for every node, the
//! matches that apply to it. Labels live in a flat arena indexed by
//! [`LabelId`]; each label keeps the ids of its children, so the arena
//! mirrors the input tree's shape without copying it.
//!
//! Per node:
//!
//! 1. leaves registered for the node's tag whose predicate accepts it;
//! 2. rules registered for the node's shape whose pattern matches it;
//! 3. only if neither produced a match, the cheapest accepting fallback.
//!
//! A node may end up with no match at all. That is not an error here; it
//! only becomes one if the reduction pass has to reduce the node.

use burs_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::matcher::match_pattern;
use crate::table::{Cost, FallbackId, LeafId, RuleId, RuleTables};
use crate::tree::{KindComparer, NodeKind, Tree, TreeComparer};

/// Index into `LabeledTree::labels`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LabelId(u32);

impl LabelId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The registered entry a match came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MatchSource {
    Leaf(LeafId),
    Rule(RuleId),
    Fallback(FallbackId),
}

#[derive(Clone, Debug)]
pub(crate) struct Match {
    pub source: MatchSource,
    pub cost: Cost,
    pub ordinal: u32,
    /// Labels of the subtrees bound to the rule's holes, in hole order.
    /// Empty for leaves and fallbacks.
    pub bindings: SmallVec<[LabelId; 3]>,
}

pub(crate) struct Label<'t, K> {
    pub node: &'t Tree<K>,
    pub children: SmallVec<[LabelId; 4]>,
    pub matches: SmallVec<[Match; 2]>,
}

impl<K> Label<'_, K> {
    /// The cheapest match; the first registered among equal costs.
    pub(crate) fn best(&self) -> Option<&Match> {
        self.matches.iter().min_by_key(|m| (m.cost, m.ordinal))
    }
}

/// Labels for one input tree. Lives for a single rewrite call.
pub(crate) struct LabeledTree<'t, K> {
    labels: Vec<Label<'t, K>>,
    root: LabelId,
}

impl<'t, K> LabeledTree<'t, K> {
    #[inline]
    pub(crate) fn root(&self) -> LabelId {
        self.root
    }

    #[inline]
    pub(crate) fn get(&self, id: LabelId) -> &Label<'t, K> {
        &self.labels[id.index()]
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }

    /// Nodes that received no match at all.
    pub(crate) fn unmatched(&self) -> usize {
        self.labels.iter().filter(|l| l.matches.is_empty()).count()
    }
}

/// Label every node of `tree`.
pub(crate) fn label_tree<'t, S: NodeKind, D>(
    tables: &RuleTables<S, D>,
    comparer: &dyn KindComparer<S>,
    trees: &dyn TreeComparer<S>,
    tree: &'t Tree<S>,
) -> LabeledTree<'t, S> {
    let mut labeler = Labeler {
        tables,
        comparer,
        trees,
        labels: Vec::new(),
    };
    let root = labeler.visit(tree);
    let labeled = LabeledTree {
        labels: labeler.labels,
        root,
    };
    tracing::debug!(
        nodes = labeled.len(),
        unmatched = labeled.unmatched(),
        "labeled tree",
    );
    labeled
}

struct Labeler<'a, 't, S: NodeKind, D> {
    tables: &'a RuleTables<S, D>,
    comparer: &'a dyn KindComparer<S>,
    trees: &'a dyn TreeComparer<S>,
    labels: Vec<Label<'t, S>>,
}

impl<'t, S: NodeKind, D> Labeler<'_, 't, S, D> {
    fn visit(&mut self, node: &'t Tree<S>) -> LabelId {
        ensure_sufficient_stack(|| {
            let mut children = SmallVec::with_capacity(node.arity());
            for child in node.children() {
                children.push(self.visit(child));
            }
            let matches = self.matches_for(node, &children);
            tracing::trace!(
                kind = ?node.kind(),
                arity = node.arity(),
                matches = matches.len(),
                "labeled node",
            );

            #[expect(
                clippy::cast_possible_truncation,
                reason = "trees have far fewer than u32::MAX nodes"
            )]
            let id = LabelId(self.labels.len() as u32);
            self.labels.push(Label {
                node,
                children,
                matches,
            });
            id
        })
    }

    fn matches_for(&self, node: &Tree<S>, children: &[LabelId]) -> SmallVec<[Match; 2]> {
        let mut matches = SmallVec::new();
        let shape = node.shape();

        for &id in self.tables.leaves_for(shape.tag) {
            let leaf = self.tables.leaf(id);
            if leaf.accepts(node) {
                matches.push(Match {
                    source: MatchSource::Leaf(id),
                    cost: leaf.cost,
                    ordinal: leaf.ordinal,
                    bindings: SmallVec::new(),
                });
            }
        }

        for &id in self.tables.rules_for(shape) {
            let rule = self.tables.rule(id);
            let Some(bound) = match_pattern(&rule.pattern, node, self.comparer, self.trees) else {
                continue;
            };
            let Some(bindings) = rule
                .pattern
                .traversals()
                .iter()
                .map(|(_, path)| self.descend(children, path))
                .collect::<Option<SmallVec<[LabelId; 3]>>>()
            else {
                continue;
            };
            debug_assert!(bound
                .iter()
                .zip(&bindings)
                .all(|(tree, &label)| Tree::ptr_eq(tree, self.labels[label.index()].node)));
            matches.push(Match {
                source: MatchSource::Rule(id),
                cost: rule.cost,
                ordinal: rule.ordinal,
                bindings,
            });
        }

        if matches.is_empty() {
            let cheapest = self
                .tables
                .fallbacks()
                .filter(|(_, fallback)| fallback.accepts(node))
                .min_by_key(|(_, fallback)| (fallback.cost, fallback.ordinal));
            if let Some((id, fallback)) = cheapest {
                matches.push(Match {
                    source: MatchSource::Fallback(id),
                    cost: fallback.cost,
                    ordinal: fallback.ordinal,
                    bindings: SmallVec::new(),
                });
            }
        }

        matches
    }

    /// Label reached by following `path` from a node whose children are
    /// labeled `children`. Hole paths are never empty since a pattern root
    /// is never a hole.
    fn descend(&self, children: &[LabelId], path: &[u32]) -> Option<LabelId> {
        let (&first, rest) = path.split_first()?;
        let mut id = *children.get(usize::try_from(first).ok()?)?;
        for &step in rest {
            id = *self.labels[id.index()]
                .children
                .get(usize::try_from(step).ok()?)?;
        }
        Some(id)
    }
}
