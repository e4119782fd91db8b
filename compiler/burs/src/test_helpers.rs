//! A small integer expression grammar shared by the unit tests.

use crate::pattern::{HoleId, WildcardFactory};
use crate::tree::{NodeKind, Tree};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Num(i64),
    Add,
    Mul,
    Neg,
    Hole(HoleId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum OpTag {
    Num,
    Add,
    Mul,
    Neg,
    Hole,
}

impl NodeKind for Op {
    type Tag = OpTag;

    fn tag(&self) -> OpTag {
        match self {
            Op::Num(_) => OpTag::Num,
            Op::Add => OpTag::Add,
            Op::Mul => OpTag::Mul,
            Op::Neg => OpTag::Neg,
            Op::Hole(_) => OpTag::Hole,
        }
    }
}

pub(crate) struct Holes;

impl WildcardFactory<Op> for Holes {
    fn create_wildcard(&self, hole: HoleId) -> Op {
        Op::Hole(hole)
    }

    fn hole_of(&self, kind: &Op) -> Option<HoleId> {
        if let Op::Hole(hole) = kind {
            Some(*hole)
        } else {
            None
        }
    }
}

pub(crate) fn num(n: i64) -> Tree<Op> {
    Tree::leaf(Op::Num(n))
}

pub(crate) fn add(a: Tree<Op>, b: Tree<Op>) -> Tree<Op> {
    Tree::new(Op::Add, [a, b])
}

pub(crate) fn mul(a: Tree<Op>, b: Tree<Op>) -> Tree<Op> {
    Tree::new(Op::Mul, [a, b])
}

pub(crate) fn neg(a: Tree<Op>) -> Tree<Op> {
    Tree::new(Op::Neg, [a])
}

/// Payload of a `Num` node.
pub(crate) fn value(tree: &Tree<Op>) -> Option<i64> {
    if let Op::Num(n) = tree.kind() {
        Some(*n)
    } else {
        None
    }
}

pub(crate) fn eval(tree: &Tree<Op>) -> i64 {
    let operand = |i: usize| tree.child(i).map_or(0, eval);
    match tree.kind() {
        Op::Num(n) => *n,
        Op::Add => operand(0).wrapping_add(operand(1)),
        Op::Mul => operand(0).wrapping_mul(operand(1)),
        Op::Neg => operand(0).wrapping_neg(),
        Op::Hole(hole) => panic!("unbound wildcard {hole} in evaluated tree"),
    }
}
