//! Immutable ordered trees.
//!
//! A [`Tree`] is a shared handle to a node: a kind value plus an ordered list
//! of child trees. Cloning a handle is a reference-count bump, and the engine
//! relies on handle identity ([`Tree::ptr_eq`]) to detect subtrees a rewrite
//! left untouched.
//!
//! Node kinds describe themselves through [`NodeKind`]. The associated
//! [`NodeKind::Tag`] is the payload-free part of a kind (`Const` rather than
//! `Const(42)`); together with the child count it forms the node's [`Shape`],
//! which is what the rule index is keyed on.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use burs_stack::ensure_sufficient_stack;

/// The value carried by each tree node.
pub trait NodeKind: Clone + fmt::Debug + PartialEq {
    /// Payload-free discriminant of a kind.
    type Tag: Copy + Eq + Hash + fmt::Debug;

    fn tag(&self) -> Self::Tag;
}

/// Equality over node kinds, used when matching pattern nodes.
///
/// The default, [`ValueComparer`], defers to `PartialEq`. Grammars with
/// interned or pooled payloads can install a cheaper comparer on the
/// builder.
pub trait KindComparer<K>: Send + Sync {
    fn kind_eq(&self, a: &K, b: &K) -> bool;
}

/// Compares kinds with `PartialEq`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueComparer;

impl<K: PartialEq> KindComparer<K> for ValueComparer {
    #[inline]
    fn kind_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Equality over whole trees, used when a hole-free pattern is matched.
///
/// `kinds` is the comparer installed for node kinds. The default,
/// [`RecursiveComparer`], walks both trees with it; grammars that intern
/// their trees can compare handles instead.
pub trait TreeComparer<K>: Send + Sync {
    fn tree_eq(&self, a: &Tree<K>, b: &Tree<K>, kinds: &dyn KindComparer<K>) -> bool;
}

/// Compares trees node by node with [`Tree::eq_with`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RecursiveComparer;

impl<K> TreeComparer<K> for RecursiveComparer {
    #[inline]
    fn tree_eq(&self, a: &Tree<K>, b: &Tree<K>, kinds: &dyn KindComparer<K>) -> bool {
        a.eq_with(b, kinds)
    }
}

/// Node tag plus child count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape<G> {
    pub tag: G,
    pub arity: usize,
}

impl<G: fmt::Debug> fmt::Display for Shape<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.tag, self.arity)
    }
}

/// Shared handle to an immutable tree node.
pub struct Tree<K> {
    node: Arc<TreeNode<K>>,
}

struct TreeNode<K> {
    kind: K,
    children: Vec<Tree<K>>,
}

impl<K> Tree<K> {
    pub fn new(kind: K, children: impl IntoIterator<Item = Tree<K>>) -> Self {
        Tree {
            node: Arc::new(TreeNode {
                kind,
                children: children.into_iter().collect(),
            }),
        }
    }

    /// A node without children.
    pub fn leaf(kind: K) -> Self {
        Tree::new(kind, [])
    }

    #[inline]
    pub fn kind(&self) -> &K {
        &self.node.kind
    }

    #[inline]
    pub fn children(&self) -> &[Tree<K>] {
        &self.node.children
    }

    #[inline]
    pub fn child(&self, index: usize) -> Option<&Tree<K>> {
        self.node.children.get(index)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.node.children.len()
    }

    /// Whether both handles refer to the same node.
    #[inline]
    pub fn ptr_eq(a: &Tree<K>, b: &Tree<K>) -> bool {
        Arc::ptr_eq(&a.node, &b.node)
    }

    /// Follow a child-index path from this node.
    pub fn at_path(&self, path: &[u32]) -> Option<&Tree<K>> {
        let mut tree = self;
        for &step in path {
            tree = tree.child(usize::try_from(step).ok()?)?;
        }
        Some(tree)
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        ensure_sufficient_stack(|| 1 + self.children().iter().map(Tree::size).sum::<usize>())
    }

    /// Length of the longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        ensure_sufficient_stack(|| 1 + self.children().iter().map(Tree::depth).max().unwrap_or(0))
    }

    /// Structural equality with kinds compared by `comparer`.
    pub fn eq_with(&self, other: &Tree<K>, comparer: &dyn KindComparer<K>) -> bool {
        if Tree::ptr_eq(self, other) {
            return true;
        }
        ensure_sufficient_stack(|| {
            comparer.kind_eq(self.kind(), other.kind())
                && self.arity() == other.arity()
                && self
                    .children()
                    .iter()
                    .zip(other.children())
                    .all(|(a, b)| a.eq_with(b, comparer))
        })
    }
}

impl<K: NodeKind> Tree<K> {
    #[inline]
    pub fn shape(&self) -> Shape<K::Tag> {
        Shape {
            tag: self.kind().tag(),
            arity: self.arity(),
        }
    }
}

impl<K: Clone> Tree<K> {
    /// A node with this node's kind and the given children.
    #[must_use]
    pub fn update(&self, children: impl IntoIterator<Item = Tree<K>>) -> Tree<K> {
        Tree::new(self.kind().clone(), children)
    }
}

impl<K> Clone for Tree<K> {
    #[inline]
    fn clone(&self) -> Self {
        Tree {
            node: Arc::clone(&self.node),
        }
    }
}

impl<K: PartialEq> PartialEq for Tree<K> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_with(other, &ValueComparer)
    }
}

impl<K: Eq> Eq for Tree<K> {}

// Children are released iteratively so that dropping a deep tree does not
// recurse once per level.
impl<K> Drop for TreeNode<K> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(tree) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(tree.node) {
                pending.append(&mut node.children);
            }
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())?;
        write_children(f, self.children(), |f, child| write!(f, "{child:?}"))
    }
}

impl<K: fmt::Display> fmt::Display for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        write_children(f, self.children(), |f, child| write!(f, "{child}"))
    }
}

/// Writes `(a, b, c)` after a node's kind; nothing for a childless node.
pub(crate) fn write_children<T>(
    f: &mut fmt::Formatter<'_>,
    children: &[T],
    mut write_child: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    if children.is_empty() {
        return Ok(());
    }
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        ensure_sufficient_stack(|| write_child(f, child))?;
    }
    f.write_str(")")
}

#[cfg(test)]
mod tests;
