//! Structural matching of compiled patterns against trees.
//!
//! A hole matches any subtree and binds it; a pattern node matches a tree
//! node whose kind compares equal and whose child count is the same, with
//! children matched pairwise. Matching looks only at the unlabeled tree:
//! how a bound subtree is later rewritten is decided when it is reduced.
//!
//! A hole-free pattern is compared against the tree as a whole, through the
//! configured [`TreeComparer`].

use burs_stack::ensure_sufficient_stack;
use smallvec::{smallvec, SmallVec};

use crate::pattern::{CompiledPattern, Pattern};
use crate::tree::{KindComparer, NodeKind, Tree, TreeComparer};

/// Subtrees bound to holes `0..arity`, in hole order.
pub(crate) type Bindings<'t, K> = SmallVec<[&'t Tree<K>; 3]>;

/// Match `compiled` against the root of `tree`.
pub(crate) fn match_pattern<'t, K: NodeKind>(
    compiled: &CompiledPattern<K>,
    tree: &'t Tree<K>,
    comparer: &dyn KindComparer<K>,
    trees: &dyn TreeComparer<K>,
) -> Option<Bindings<'t, K>> {
    if let Some(ground) = compiled.ground() {
        return trees
            .tree_eq(ground, tree, comparer)
            .then(SmallVec::new);
    }
    let mut slots: SmallVec<[Option<&'t Tree<K>>; 3]> = smallvec![None; compiled.arity()];
    if !bind(compiled.pattern(), tree, comparer, &mut slots) {
        return None;
    }
    slots.into_iter().collect()
}

fn bind<'t, K: NodeKind>(
    pattern: &Pattern<K>,
    tree: &'t Tree<K>,
    comparer: &dyn KindComparer<K>,
    slots: &mut [Option<&'t Tree<K>>],
) -> bool {
    match pattern {
        Pattern::Hole(hole) => match slots.get_mut(hole.index()) {
            Some(slot) => {
                *slot = Some(tree);
                true
            }
            None => false,
        },
        Pattern::Node { kind, children } => {
            comparer.kind_eq(kind, tree.kind())
                && children.len() == tree.arity()
                && ensure_sufficient_stack(|| {
                    children
                        .iter()
                        .zip(tree.children())
                        .all(|(pattern, child)| bind(pattern, child, comparer, slots))
                })
        }
    }
}
