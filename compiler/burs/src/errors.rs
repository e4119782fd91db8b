//! Error types for registration, rewriting and the shape trie.

use std::fmt;

use crate::pattern::HoleId;
use crate::table::Cost;
use crate::tree::Tree;

/// A leaf, rule or fallback was rejected at registration.
///
/// Registration errors never poison the builder: the offending entry is not
/// added, and everything registered before it stays usable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Costs rank alternatives and must be non-negative.
    #[error("cost must be non-negative, got {cost}")]
    NegativeCost { cost: Cost },

    /// A declared hole never occurs in the tree the pattern template built.
    #[error("wildcard {hole} is declared but never occurs in the pattern")]
    UnusedWildcard { hole: HoleId },

    /// A hole occurs at more than one position. Patterns are linear.
    #[error("wildcard {hole} occurs more than once in the pattern")]
    RepeatedWildcard { hole: HoleId },

    /// The template built a wildcard that was not handed to it.
    #[error("wildcard {hole} does not belong to a pattern with {arity} holes")]
    StrayWildcard { hole: HoleId, arity: usize },

    /// A bare hole matches every node; that is what fallbacks are for.
    #[error("pattern root is a wildcard; register a fallback instead")]
    WildcardRoot,

    #[error(transparent)]
    Index(#[from] NAryMapError),
}

/// Failure of a single `rewrite`/`optimize` call.
///
/// The engine holds no per-call state, so a failed call leaves it usable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// Nothing reduces the node and it cannot be kept as-is.
    #[error("no leaf, rule or fallback reduces `{kind}` with {arity} children")]
    Irreducible { kind: String, arity: usize },

    /// A converter asked for a child the node does not have.
    #[error("child {index} requested from a node with {arity} children")]
    MissingChild { index: usize, arity: usize },
}

impl RewriteError {
    /// The error reported for `node` when nothing reduces it.
    pub fn irreducible<K: fmt::Debug>(node: &Tree<K>) -> Self {
        RewriteError::Irreducible {
            kind: format!("{:?}", node.kind()),
            arity: node.arity(),
        }
    }
}

/// Misuse of an [`NAryMap`](crate::NAryMap).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NAryMapError {
    #[error("key has {found} segments but the map has arity {expected}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("key not present in map")]
    NotFound,
}
