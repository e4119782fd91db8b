//! A register-free integer IR, the target of [`calc`](crate::calc)
//! lowering.
//!
//! Unlike the source grammars, IR values are plain recursive enums rather
//! than [`Tree`]s: the rewriter builds them bottom-up and never needs to
//! match on them.

use std::fmt;

use burs::Tree;
use burs_stack::ensure_sufficient_stack;

use crate::calc::{self, Calc};
use crate::EvalError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ir {
    Imm(i64),
    Add(Box<Ir>, Box<Ir>),
    /// Add one.
    Inc(Box<Ir>),
    Mul(Box<Ir>, Box<Ir>),
    /// Shift left by a constant.
    Shl(Box<Ir>, u32),
    /// A source subtree left for the interpreter.
    Deferred(Tree<Calc>),
}

impl Ir {
    pub fn sum(a: Ir, b: Ir) -> Ir {
        Ir::Add(Box::new(a), Box::new(b))
    }

    pub fn inc(a: Ir) -> Ir {
        Ir::Inc(Box::new(a))
    }

    pub fn product(a: Ir, b: Ir) -> Ir {
        Ir::Mul(Box::new(a), Box::new(b))
    }

    pub fn shift_left(a: Ir, by: u32) -> Ir {
        Ir::Shl(Box::new(a), by)
    }

    pub fn eval(&self) -> Result<i64, EvalError> {
        ensure_sufficient_stack(|| match self {
            Ir::Imm(n) => Ok(*n),
            Ir::Add(a, b) => Ok(a.eval()?.wrapping_add(b.eval()?)),
            Ir::Inc(a) => Ok(a.eval()?.wrapping_add(1)),
            Ir::Mul(a, b) => Ok(a.eval()?.wrapping_mul(b.eval()?)),
            Ir::Shl(a, by) => Ok(a.eval()?.wrapping_shl(*by)),
            Ir::Deferred(tree) => calc::eval(tree),
        })
    }

    /// Number of instructions, not counting deferred subtrees.
    pub fn instructions(&self) -> usize {
        ensure_sufficient_stack(|| match self {
            Ir::Imm(_) | Ir::Deferred(_) => 0,
            Ir::Inc(a) | Ir::Shl(a, _) => 1 + a.instructions(),
            Ir::Add(a, b) | Ir::Mul(a, b) => 1 + a.instructions() + b.instructions(),
        })
    }
}

impl fmt::Display for Ir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Ir::Imm(n) => write!(f, "{n}"),
            Ir::Add(a, b) => write!(f, "add({a}, {b})"),
            Ir::Inc(a) => write!(f, "inc({a})"),
            Ir::Mul(a, b) => write!(f, "mul({a}, {b})"),
            Ir::Shl(a, by) => write!(f, "shl({a}, {by})"),
            Ir::Deferred(tree) => write!(f, "defer[{tree}]"),
        })
    }
}
