//! Propositional logic over named variables.

use std::fmt;

use burs::{BottomUpOptimizer, ConfigError, HoleId, NodeKind, Tree, WildcardFactory};
use burs_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use crate::{operands, EvalError};

/// Variable assignment used by [`eval`].
pub type Env = FxHashMap<String, bool>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Logic {
    True,
    False,
    Var(String),
    Not,
    And,
    Or,
    Wildcard(HoleId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicTag {
    True,
    False,
    Var,
    Not,
    And,
    Or,
    Wildcard,
}

impl NodeKind for Logic {
    type Tag = LogicTag;

    fn tag(&self) -> LogicTag {
        match self {
            Logic::True => LogicTag::True,
            Logic::False => LogicTag::False,
            Logic::Var(_) => LogicTag::Var,
            Logic::Not => LogicTag::Not,
            Logic::And => LogicTag::And,
            Logic::Or => LogicTag::Or,
            Logic::Wildcard(_) => LogicTag::Wildcard,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::True => f.write_str("True"),
            Logic::False => f.write_str("False"),
            Logic::Var(name) => f.write_str(name),
            Logic::Not => f.write_str("Not"),
            Logic::And => f.write_str("And"),
            Logic::Or => f.write_str("Or"),
            Logic::Wildcard(hole) => write!(f, "{hole}"),
        }
    }
}

pub struct LogicWildcards;

impl WildcardFactory<Logic> for LogicWildcards {
    fn create_wildcard(&self, hole: HoleId) -> Logic {
        Logic::Wildcard(hole)
    }

    fn hole_of(&self, kind: &Logic) -> Option<HoleId> {
        if let Logic::Wildcard(hole) = kind {
            Some(*hole)
        } else {
            None
        }
    }
}

pub fn truth() -> Tree<Logic> {
    Tree::leaf(Logic::True)
}

pub fn falsity() -> Tree<Logic> {
    Tree::leaf(Logic::False)
}

pub fn boolean(value: bool) -> Tree<Logic> {
    if value {
        truth()
    } else {
        falsity()
    }
}

pub fn var(name: &str) -> Tree<Logic> {
    Tree::leaf(Logic::Var(name.to_owned()))
}

pub fn not(a: Tree<Logic>) -> Tree<Logic> {
    Tree::new(Logic::Not, [a])
}

pub fn and(a: Tree<Logic>, b: Tree<Logic>) -> Tree<Logic> {
    Tree::new(Logic::And, [a, b])
}

pub fn or(a: Tree<Logic>, b: Tree<Logic>) -> Tree<Logic> {
    Tree::new(Logic::Or, [a, b])
}

pub fn eval(tree: &Tree<Logic>, env: &Env) -> Result<bool, EvalError> {
    ensure_sufficient_stack(|| match tree.kind() {
        Logic::True => Ok(true),
        Logic::False => Ok(false),
        Logic::Var(name) => env
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
        Logic::Not => {
            let [a] = operands::<_, 1>(tree, "Not")?;
            Ok(!eval(a, env)?)
        }
        // Both operands are evaluated so that unbound variables are
        // reported regardless of short-circuiting.
        Logic::And => {
            let [a, b] = operands::<_, 2>(tree, "And")?;
            let (a, b) = (eval(a, env)?, eval(b, env)?);
            Ok(a && b)
        }
        Logic::Or => {
            let [a, b] = operands::<_, 2>(tree, "Or")?;
            let (a, b) = (eval(a, env)?, eval(b, env)?);
            Ok(a || b)
        }
        Logic::Wildcard(hole) => Err(EvalError::Wildcard(*hole)),
    })
}

/// Constant propagation through `Not`, `And` and `Or`.
///
/// Rules only look at the input tree: `Or(Not(False), Not(True))` has no
/// constant operand, so it becomes `Or(True, False)` after one call and
/// `True` after a second.
///
/// Absorbing constants discard their other operand, variables included, so
/// the simplified tree evaluates like the input only under an environment
/// binding every variable of the input. Under a partial one, `And(False, x)`
/// fails on an unbound `x` while its simplification, `False`, does not.
pub fn simplifier() -> Result<BottomUpOptimizer<Logic>, ConfigError> {
    let mut builder = BottomUpOptimizer::builder(LogicWildcards);
    builder
        .rules()
        .add0(|| not(truth()), falsity, 0)?
        .add0(|| not(falsity()), truth, 0)?
        .add1(|x| not(not(x)), |x| x, 0)?
        .add1(|x| and(truth(), x), |x| x, 0)?
        .add1(|x| and(x, truth()), |x| x, 0)?
        .add1(|x| and(falsity(), x), |_| falsity(), 0)?
        .add1(|x| and(x, falsity()), |_| falsity(), 0)?
        .add1(|x| or(falsity(), x), |x| x, 0)?
        .add1(|x| or(x, falsity()), |x| x, 0)?
        .add1(|x| or(truth(), x), |_| truth(), 0)?
        .add1(|x| or(x, truth()), |_| truth(), 0)?;
    Ok(builder.build_optimizer())
}

#[cfg(test)]
mod tests;
