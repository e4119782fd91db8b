//! Pattern compilation.
//!
//! Rule patterns are written as ordinary closures over source trees. The
//! closure is called exactly once, with one freshly minted wildcard tree per
//! free variable, and the tree it returns is lowered into a [`Pattern`]: the
//! same shape, with every wildcard node replaced by an explicit
//! [`Pattern::Hole`].
//!
//! While lowering, each hole's child-index path from the pattern root is
//! recorded in a [`WildcardTraversalMap`]. The reduction pass follows these
//! paths to find the label of the subtree bound to each hole.
//!
//! # Validation
//!
//! All checks happen at registration, never at match time:
//!
//! - every declared hole occurs exactly once (`UnusedWildcard`,
//!   `RepeatedWildcard`);
//! - no wildcard other than the declared ones occurs (`StrayWildcard`);
//! - the root is not a hole (`WildcardRoot`).

use std::fmt;

use burs_stack::ensure_sufficient_stack;
use smallvec::SmallVec;

use crate::errors::ConfigError;
use crate::tree::{write_children, NodeKind, Shape, Tree};

/// Identity of a free variable within one pattern.
///
/// Holes of an `N`-ary pattern are numbered `0..N` in parameter order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HoleId(u32);

impl HoleId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        HoleId(index)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Mints wildcard kinds for pattern templates and recognizes them again.
///
/// Grammars usually reserve one kind variant, e.g. `Op::Hole(HoleId)`.
/// Wildcards only ever exist while a template is being evaluated.
pub trait WildcardFactory<K> {
    fn create_wildcard(&self, hole: HoleId) -> K;

    fn hole_of(&self, kind: &K) -> Option<HoleId>;
}

/// A compiled rule left-hand side.
#[derive(Clone, PartialEq)]
pub enum Pattern<K> {
    Node { kind: K, children: Vec<Pattern<K>> },
    Hole(HoleId),
}

impl<K> Pattern<K> {
    pub fn is_hole(&self) -> bool {
        matches!(self, Pattern::Hole(_))
    }
}

impl<K: NodeKind> Pattern<K> {
    /// Shape of the root node; `None` for a bare hole.
    pub fn shape(&self) -> Option<Shape<K::Tag>> {
        match self {
            Pattern::Node { kind, children } => Some(Shape {
                tag: kind.tag(),
                arity: children.len(),
            }),
            Pattern::Hole(_) => None,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Pattern<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Node { kind, children } => {
                write!(f, "{kind:?}")?;
                write_children(f, children, |f, child| write!(f, "{child:?}"))
            }
            Pattern::Hole(hole) => write!(f, "{hole}"),
        }
    }
}

/// Child-index path from a pattern root to one hole.
pub type WildcardTraversal = SmallVec<[u32; 4]>;

/// Hole → traversal, kept sorted by hole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WildcardTraversalMap {
    entries: SmallVec<[(HoleId, WildcardTraversal); 3]>,
}

impl WildcardTraversalMap {
    /// A map holding `hole` at the root of the (sub)pattern.
    pub fn singleton(hole: HoleId) -> Self {
        let mut entries = SmallVec::new();
        entries.push((hole, WildcardTraversal::new()));
        WildcardTraversalMap { entries }
    }

    pub fn get(&self, hole: HoleId) -> Option<&[u32]> {
        self.entries
            .binary_search_by_key(&hole, |(h, _)| *h)
            .ok()
            .map(|i| self.entries[i].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in hole order.
    pub fn iter(&self) -> impl Iterator<Item = (HoleId, &[u32])> + '_ {
        self.entries.iter().map(|(hole, path)| (*hole, path.as_slice()))
    }

    /// Re-root every traversal under child `index` of a parent node.
    #[must_use]
    pub fn under(mut self, index: u32) -> Self {
        for (_, path) in &mut self.entries {
            path.insert(0, index);
        }
        self
    }

    /// Union of two maps over disjoint holes.
    pub fn merge(mut self, other: WildcardTraversalMap) -> Result<Self, ConfigError> {
        for (hole, path) in other.entries {
            match self.entries.binary_search_by_key(&hole, |(h, _)| *h) {
                Ok(_) => return Err(ConfigError::RepeatedWildcard { hole }),
                Err(at) => self.entries.insert(at, (hole, path)),
            }
        }
        Ok(self)
    }
}

/// A validated pattern together with its hole traversals.
#[derive(Clone, Debug)]
pub struct CompiledPattern<K: NodeKind> {
    pattern: Pattern<K>,
    traversals: WildcardTraversalMap,
    shape: Shape<K::Tag>,
    /// The template's tree, kept for hole-free patterns.
    ground: Option<Tree<K>>,
}

impl<K: NodeKind> CompiledPattern<K> {
    pub fn pattern(&self) -> &Pattern<K> {
        &self.pattern
    }

    pub fn traversals(&self) -> &WildcardTraversalMap {
        &self.traversals
    }

    /// Number of holes.
    pub fn arity(&self) -> usize {
        self.traversals.len()
    }

    /// Shape of the pattern root, which is never a hole.
    pub fn shape(&self) -> Shape<K::Tag> {
        self.shape
    }

    /// The tree a hole-free pattern matches, compared as a whole.
    pub fn ground(&self) -> Option<&Tree<K>> {
        self.ground.as_ref()
    }
}

/// Evaluate an `N`-hole template once and compile the tree it builds.
pub(crate) fn compile_template<K: NodeKind, const N: usize>(
    factory: &dyn WildcardFactory<K>,
    template: impl FnOnce([Tree<K>; N]) -> Tree<K>,
) -> Result<CompiledPattern<K>, ConfigError> {
    let holes: [Tree<K>; N] = std::array::from_fn(|i| {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "templates take at most three holes"
        )]
        let hole = HoleId::new(i as u32);
        Tree::leaf(factory.create_wildcard(hole))
    });
    compile(&template(holes), N, factory)
}

/// Lower a template's output tree into a pattern with `arity` holes.
pub(crate) fn compile<K: NodeKind>(
    tree: &Tree<K>,
    arity: usize,
    factory: &dyn WildcardFactory<K>,
) -> Result<CompiledPattern<K>, ConfigError> {
    let (pattern, traversals) = lower(tree, factory)?;

    for (hole, _) in traversals.iter() {
        if hole.index() >= arity {
            return Err(ConfigError::StrayWildcard { hole, arity });
        }
    }
    for index in 0..arity {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "templates take at most three holes"
        )]
        let hole = HoleId::new(index as u32);
        if traversals.get(hole).is_none() {
            return Err(ConfigError::UnusedWildcard { hole });
        }
    }
    let Some(shape) = pattern.shape() else {
        return Err(ConfigError::WildcardRoot);
    };

    let ground = traversals.is_empty().then(|| tree.clone());
    Ok(CompiledPattern {
        pattern,
        traversals,
        shape,
        ground,
    })
}

fn lower<K: NodeKind>(
    tree: &Tree<K>,
    factory: &dyn WildcardFactory<K>,
) -> Result<(Pattern<K>, WildcardTraversalMap), ConfigError> {
    if let Some(hole) = factory.hole_of(tree.kind()) {
        return Ok((Pattern::Hole(hole), WildcardTraversalMap::singleton(hole)));
    }

    ensure_sufficient_stack(|| {
        let mut traversals = WildcardTraversalMap::default();
        let mut children = Vec::with_capacity(tree.arity());
        for (index, child) in tree.children().iter().enumerate() {
            let (pattern, child_traversals) = lower(child, factory)?;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "child counts fit in u32"
            )]
            let step = index as u32;
            traversals = traversals.merge(child_traversals.under(step))?;
            children.push(pattern);
        }
        Ok((
            Pattern::Node {
                kind: tree.kind().clone(),
                children,
            },
            traversals,
        ))
    })
}

#[cfg(test)]
mod tests;
