//! Integer arithmetic: constants, addition, multiplication and negation.
//!
//! Arithmetic wraps on overflow, both when evaluating and when folding, so
//! every tree has a value.

use std::fmt;

use burs::{
    BottomUpOptimizer, ConfigError, HoleId, NodeKind, OptimizerBuilder, ReduceContext,
    RewriteError, Tree, WildcardFactory,
};
use burs_stack::ensure_sufficient_stack;

use crate::{operands, EvalError};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Arith {
    Const(i64),
    Add,
    Multiply,
    Negate,
    Wildcard(HoleId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithTag {
    Const,
    Add,
    Multiply,
    Negate,
    Wildcard,
}

impl NodeKind for Arith {
    type Tag = ArithTag;

    fn tag(&self) -> ArithTag {
        match self {
            Arith::Const(_) => ArithTag::Const,
            Arith::Add => ArithTag::Add,
            Arith::Multiply => ArithTag::Multiply,
            Arith::Negate => ArithTag::Negate,
            Arith::Wildcard(_) => ArithTag::Wildcard,
        }
    }
}

impl fmt::Display for Arith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arith::Const(n) => write!(f, "{n}"),
            Arith::Add => f.write_str("add"),
            Arith::Multiply => f.write_str("mul"),
            Arith::Negate => f.write_str("neg"),
            Arith::Wildcard(hole) => write!(f, "{hole}"),
        }
    }
}

pub struct ArithWildcards;

impl WildcardFactory<Arith> for ArithWildcards {
    fn create_wildcard(&self, hole: HoleId) -> Arith {
        Arith::Wildcard(hole)
    }

    fn hole_of(&self, kind: &Arith) -> Option<HoleId> {
        if let Arith::Wildcard(hole) = kind {
            Some(*hole)
        } else {
            None
        }
    }
}

pub fn constant(n: i64) -> Tree<Arith> {
    Tree::leaf(Arith::Const(n))
}

pub fn add(a: Tree<Arith>, b: Tree<Arith>) -> Tree<Arith> {
    Tree::new(Arith::Add, [a, b])
}

pub fn multiply(a: Tree<Arith>, b: Tree<Arith>) -> Tree<Arith> {
    Tree::new(Arith::Multiply, [a, b])
}

pub fn negate(a: Tree<Arith>) -> Tree<Arith> {
    Tree::new(Arith::Negate, [a])
}

/// Payload of a `Const` node.
pub fn constant_value(tree: &Tree<Arith>) -> Option<i64> {
    if let Arith::Const(n) = tree.kind() {
        Some(*n)
    } else {
        None
    }
}

pub fn eval(tree: &Tree<Arith>) -> Result<i64, EvalError> {
    ensure_sufficient_stack(|| match tree.kind() {
        Arith::Const(n) => Ok(*n),
        Arith::Add => {
            let [a, b] = operands::<_, 2>(tree, "add")?;
            Ok(eval(a)?.wrapping_add(eval(b)?))
        }
        Arith::Multiply => {
            let [a, b] = operands::<_, 2>(tree, "mul")?;
            Ok(eval(a)?.wrapping_mul(eval(b)?))
        }
        Arith::Negate => {
            let [a] = operands::<_, 1>(tree, "neg")?;
            Ok(eval(a)?.wrapping_neg())
        }
        Arith::Wildcard(hole) => Err(EvalError::Wildcard(*hole)),
    })
}

fn identity_rules(builder: &mut OptimizerBuilder<Arith>) -> Result<(), ConfigError> {
    builder
        .rules()
        .add1(|n| add(n, constant(0)), |n| n, 0)?
        .add1(|n| add(constant(0), n), |n| n, 0)?
        .add1(|n| multiply(n, constant(1)), |n| n, 0)?
        .add1(|n| multiply(constant(1), n), |n| n, 0)?
        .add1(|n| negate(negate(n)), |n| n, 0)?;
    Ok(())
}

/// Removes additive and multiplicative identities and double negation.
///
/// `add(42, 0)` becomes `42`. Nodes no rule applies to keep their kind.
pub fn simplifier() -> Result<BottomUpOptimizer<Arith>, ConfigError> {
    let mut builder = BottomUpOptimizer::builder(ArithWildcards);
    identity_rules(&mut builder)?;
    Ok(builder.build_optimizer())
}

/// The simplifier plus constant folding.
///
/// Folding leaves reduce their operands first, so constants propagate
/// through a whole tree in a single call. Identity rules are cheaper and
/// win where both apply.
pub fn folder() -> Result<BottomUpOptimizer<Arith>, ConfigError> {
    let mut builder = BottomUpOptimizer::builder(ArithWildcards);
    identity_rules(&mut builder)?;
    builder
        .leaves()
        .add_with(ArithTag::Add, fold, 1)?
        .add_with(ArithTag::Multiply, fold, 1)?
        .add_with(ArithTag::Negate, fold, 1)?;
    Ok(builder.build_optimizer())
}

fn fold(ctx: &ReduceContext<'_, Arith, Tree<Arith>>) -> Result<Tree<Arith>, RewriteError> {
    let node = ctx.node();
    let children = ctx.reduce_children()?;
    let values: Option<Vec<i64>> = children.iter().map(constant_value).collect();

    let folded = match (node.kind(), values.as_deref()) {
        (Arith::Add, Some(&[a, b])) => Some(a.wrapping_add(b)),
        (Arith::Multiply, Some(&[a, b])) => Some(a.wrapping_mul(b)),
        (Arith::Negate, Some(&[a])) => Some(a.wrapping_neg()),
        _ => None,
    };
    if let Some(n) = folded {
        tracing::trace!(kind = ?node.kind(), value = n, "folded constant");
        return Ok(constant(n));
    }

    let unchanged = children
        .iter()
        .zip(node.children())
        .all(|(new, old)| Tree::ptr_eq(new, old));
    Ok(if unchanged {
        node.clone()
    } else {
        node.update(children)
    })
}

#[cfg(test)]
mod tests;
