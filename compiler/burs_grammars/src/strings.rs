//! String expressions: literals, case conversion and n-ary concatenation.

use std::fmt;

use burs::{
    BottomUpOptimizer, ConfigError, HoleId, NodeKind, ReduceContext, RewriteError, Tree,
    WildcardFactory,
};
use burs_stack::ensure_sufficient_stack;

use crate::{operands, EvalError};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Str {
    Const(String),
    ToUpper,
    ToLower,
    /// Any number of operands, including none.
    Concat,
    Wildcard(HoleId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrTag {
    Const,
    ToUpper,
    ToLower,
    Concat,
    Wildcard,
}

impl NodeKind for Str {
    type Tag = StrTag;

    fn tag(&self) -> StrTag {
        match self {
            Str::Const(_) => StrTag::Const,
            Str::ToUpper => StrTag::ToUpper,
            Str::ToLower => StrTag::ToLower,
            Str::Concat => StrTag::Concat,
            Str::Wildcard(_) => StrTag::Wildcard,
        }
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Str::Const(s) => write!(f, "{s:?}"),
            Str::ToUpper => f.write_str("ToUpper"),
            Str::ToLower => f.write_str("ToLower"),
            Str::Concat => f.write_str("Concat"),
            Str::Wildcard(hole) => write!(f, "{hole}"),
        }
    }
}

pub struct StrWildcards;

impl WildcardFactory<Str> for StrWildcards {
    fn create_wildcard(&self, hole: HoleId) -> Str {
        Str::Wildcard(hole)
    }

    fn hole_of(&self, kind: &Str) -> Option<HoleId> {
        if let Str::Wildcard(hole) = kind {
            Some(*hole)
        } else {
            None
        }
    }
}

pub fn literal(s: &str) -> Tree<Str> {
    Tree::leaf(Str::Const(s.to_owned()))
}

/// The empty literal.
pub fn empty() -> Tree<Str> {
    literal("")
}

pub fn to_upper(a: Tree<Str>) -> Tree<Str> {
    Tree::new(Str::ToUpper, [a])
}

pub fn to_lower(a: Tree<Str>) -> Tree<Str> {
    Tree::new(Str::ToLower, [a])
}

pub fn concat(parts: impl IntoIterator<Item = Tree<Str>>) -> Tree<Str> {
    Tree::new(Str::Concat, parts)
}

pub fn eval(tree: &Tree<Str>) -> Result<String, EvalError> {
    ensure_sufficient_stack(|| match tree.kind() {
        Str::Const(s) => Ok(s.clone()),
        Str::ToUpper => {
            let [a] = operands::<_, 1>(tree, "ToUpper")?;
            Ok(eval(a)?.to_uppercase())
        }
        Str::ToLower => {
            let [a] = operands::<_, 1>(tree, "ToLower")?;
            Ok(eval(a)?.to_lowercase())
        }
        Str::Concat => tree.children().iter().map(eval).collect(),
        Str::Wildcard(hole) => Err(EvalError::Wildcard(*hole)),
    })
}

/// Whether a normalized operand evaluates to the empty string.
///
/// Normalization turns every blank `Concat` into the empty literal before
/// its parent sees it, so only case conversions are looked through.
fn is_blank(tree: &Tree<Str>) -> bool {
    let mut tree = tree;
    loop {
        match (tree.kind(), tree.children()) {
            (Str::Const(s), _) => return s.is_empty(),
            (Str::ToUpper | Str::ToLower, [inner]) => tree = inner,
            _ => return false,
        }
    }
}

/// Collapses nested case conversions and drops blank concatenation
/// operands.
///
/// The outer conversion decides the case, so `ToUpper(ToLower(x))` is
/// `ToUpper(x)`. That holds exactly for ASCII text; a few Unicode letters
/// (`ẞ`) do not round-trip through lowercase.
///
/// A `Concat` without operands is the empty literal; any other `Concat` is
/// rebuilt from its normalized operands, minus those that are blank.
pub fn normalizer() -> Result<BottomUpOptimizer<Str>, ConfigError> {
    let mut builder = BottomUpOptimizer::builder(StrWildcards);
    builder
        .leaves()
        .add_if(StrTag::Concat, |t| t.arity() == 0, |_| empty(), 0)?
        .add_with(StrTag::Concat, drop_blank_operands, 1)?;
    builder
        .rules()
        .add1(|x| to_upper(to_upper(x)), to_upper, 0)?
        .add1(|x| to_upper(to_lower(x)), to_upper, 0)?
        .add1(|x| to_lower(to_lower(x)), to_lower, 0)?
        .add1(|x| to_lower(to_upper(x)), to_lower, 0)?;
    Ok(builder.build_optimizer())
}

fn drop_blank_operands(
    ctx: &ReduceContext<'_, Str, Tree<Str>>,
) -> Result<Tree<Str>, RewriteError> {
    let node = ctx.node();
    let parts = ctx.reduce_children()?;
    let kept: Vec<Tree<Str>> = parts.iter().filter(|p| !is_blank(p)).cloned().collect();
    tracing::trace!(
        operands = parts.len(),
        dropped = parts.len() - kept.len(),
        "normalized concat",
    );

    if kept.is_empty() {
        return Ok(empty());
    }
    let unchanged = kept.len() == node.arity()
        && kept
            .iter()
            .zip(node.children())
            .all(|(new, old)| Tree::ptr_eq(new, old));
    Ok(if unchanged {
        node.clone()
    } else {
        node.update(kept)
    })
}

#[cfg(test)]
mod tests;
