//! A calculator language and its lowering to [`Ir`].
//!
//! Lowering is instruction selection in miniature: `Plus(x, Lit(1))` could
//! become either `add(x, 1)` or `inc(x)`, and the cheaper `inc` is chosen.
//!
//! | Pattern                      | Ir              | Cost |
//! |------------------------------|-----------------|------|
//! | `Lit(n)`                     | `n`             | 0    |
//! | `Plus(x, y)`                 | `add(x, y)`     | 2    |
//! | `Plus(x, Lit(1))`, mirrored  | `inc(x)`        | 1    |
//! | `Times(x, y)`                | `mul(x, y)`     | 4    |
//! | `Times(x, Lit(2))`, mirrored | `shl(x, 1)`     | 1    |
//! | anything else, if deferred   | `defer[tree]`   | 100  |

use std::fmt;

use burs::{
    BottomUpRewriter, ConfigError, HoleId, NodeKind, ReduceContext, RewriteError, RewriterBuilder,
    Tree, WildcardFactory,
};
use burs_stack::ensure_sufficient_stack;

use crate::ir::Ir;
use crate::{operands, EvalError};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Calc {
    Lit(i64),
    Plus,
    Times,
    Wildcard(HoleId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalcTag {
    Lit,
    Plus,
    Times,
    Wildcard,
}

impl NodeKind for Calc {
    type Tag = CalcTag;

    fn tag(&self) -> CalcTag {
        match self {
            Calc::Lit(_) => CalcTag::Lit,
            Calc::Plus => CalcTag::Plus,
            Calc::Times => CalcTag::Times,
            Calc::Wildcard(_) => CalcTag::Wildcard,
        }
    }
}

impl fmt::Display for Calc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Calc::Lit(n) => write!(f, "{n}"),
            Calc::Plus => f.write_str("Plus"),
            Calc::Times => f.write_str("Times"),
            Calc::Wildcard(hole) => write!(f, "{hole}"),
        }
    }
}

pub struct CalcWildcards;

impl WildcardFactory<Calc> for CalcWildcards {
    fn create_wildcard(&self, hole: HoleId) -> Calc {
        Calc::Wildcard(hole)
    }

    fn hole_of(&self, kind: &Calc) -> Option<HoleId> {
        if let Calc::Wildcard(hole) = kind {
            Some(*hole)
        } else {
            None
        }
    }
}

pub fn lit(n: i64) -> Tree<Calc> {
    Tree::leaf(Calc::Lit(n))
}

pub fn plus(a: Tree<Calc>, b: Tree<Calc>) -> Tree<Calc> {
    Tree::new(Calc::Plus, [a, b])
}

pub fn times(a: Tree<Calc>, b: Tree<Calc>) -> Tree<Calc> {
    Tree::new(Calc::Times, [a, b])
}

pub fn eval(tree: &Tree<Calc>) -> Result<i64, EvalError> {
    ensure_sufficient_stack(|| match tree.kind() {
        Calc::Lit(n) => Ok(*n),
        Calc::Plus => {
            let [a, b] = operands::<_, 2>(tree, "Plus")?;
            Ok(eval(a)?.wrapping_add(eval(b)?))
        }
        Calc::Times => {
            let [a, b] = operands::<_, 2>(tree, "Times")?;
            Ok(eval(a)?.wrapping_mul(eval(b)?))
        }
        Calc::Wildcard(hole) => Err(EvalError::Wildcard(*hole)),
    })
}

/// Leaves are selected by tag, so only `Lit` nodes get here.
fn immediate(ctx: &ReduceContext<'_, Calc, Ir>) -> Result<Ir, RewriteError> {
    if let Calc::Lit(n) = ctx.node().kind() {
        Ok(Ir::Imm(*n))
    } else {
        Err(RewriteError::irreducible(ctx.node()))
    }
}

/// Literals and addition only. `Times` nodes are irreducible.
pub fn additive() -> Result<RewriterBuilder<Calc, Ir>, ConfigError> {
    let mut builder: RewriterBuilder<Calc, Ir> = BottomUpRewriter::builder(CalcWildcards);
    builder.leaves().add_with(CalcTag::Lit, immediate, 0)?;
    builder
        .rules()
        .add2(plus, Ir::sum, 2)?
        .add1(|x| plus(x, lit(1)), Ir::inc, 1)?
        .add1(|x| plus(lit(1), x), Ir::inc, 1)?;
    Ok(builder)
}

pub fn add_multiplication(builder: &mut RewriterBuilder<Calc, Ir>) -> Result<(), ConfigError> {
    builder
        .rules()
        .add2(times, Ir::product, 4)?
        .add1(|x| times(x, lit(2)), |x| Ir::shift_left(x, 1), 1)?
        .add1(|x| times(lit(2), x), |x| Ir::shift_left(x, 1), 1)?;
    Ok(())
}

/// Hand every node nothing else lowers to the interpreter.
pub fn add_deferral(builder: &mut RewriterBuilder<Calc, Ir>) -> Result<(), ConfigError> {
    builder
        .fallbacks()
        .add(|t| Ir::Deferred(t.clone()), 100)?;
    Ok(())
}

/// Full lowering: addition and multiplication, nothing deferred.
pub fn lowering() -> Result<BottomUpRewriter<Calc, Ir>, ConfigError> {
    let mut builder = additive()?;
    add_multiplication(&mut builder)?;
    let rewriter = builder.build();
    tracing::debug!(tables = %rewriter.debug_view(), "built calc lowering");
    Ok(rewriter)
}

#[cfg(test)]
mod tests;
