#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn literals_and_addition_lower_directly() {
    let rewriter = additive().unwrap().build();
    assert_eq!(
        rewriter.rewrite(&plus(lit(3), lit(4))),
        Ok(Ir::sum(Ir::Imm(3), Ir::Imm(4)))
    );
}

#[test]
fn increment_is_cheaper_than_addition() {
    let rewriter = lowering().unwrap();
    assert_eq!(
        rewriter.rewrite(&plus(lit(1), plus(lit(5), lit(1)))),
        Ok(Ir::inc(Ir::inc(Ir::Imm(5))))
    );
}

#[test]
fn doubling_becomes_a_shift() {
    let rewriter = lowering().unwrap();
    let lowered = rewriter.rewrite(&times(plus(lit(2), lit(3)), lit(2))).unwrap();
    assert_eq!(lowered, Ir::shift_left(Ir::sum(Ir::Imm(2), Ir::Imm(3)), 1));
    assert_eq!(lowered.to_string(), "shl(add(2, 3), 1)");
    assert_eq!(lowered.eval(), Ok(10));
    assert_eq!(lowered.instructions(), 2);
}

#[test]
fn deferred_subtrees_evaluate_through_the_source() {
    let deferred = Ir::inc(Ir::Deferred(times(lit(6), lit(7))));
    assert_eq!(deferred.eval(), Ok(43));
    assert_eq!(deferred.instructions(), 1);
    assert_eq!(deferred.to_string(), "inc(defer[Times(6, 7)])");
}

#[test]
fn literals_become_immediates() {
    let rewriter = additive().unwrap().build();
    assert_eq!(rewriter.rewrite(&lit(-9)), Ok(Ir::Imm(-9)));
    assert_eq!(
        rewriter.rewrite(&plus(lit(-9), lit(1))),
        Ok(Ir::inc(Ir::Imm(-9)))
    );
}
