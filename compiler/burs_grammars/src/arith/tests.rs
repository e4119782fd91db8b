#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn eval_wraps_on_overflow() {
    assert_eq!(eval(&add(constant(i64::MAX), constant(1))), Ok(i64::MIN));
    assert_eq!(eval(&negate(constant(i64::MIN))), Ok(i64::MIN));
    assert_eq!(
        eval(&multiply(add(constant(2), constant(3)), negate(constant(4)))),
        Ok(-20)
    );
}

#[test]
fn eval_rejects_malformed_trees() {
    let short = Tree::new(Arith::Add, [constant(1)]);
    assert_eq!(
        eval(&short),
        Err(EvalError::Arity {
            kind: "add",
            expected: 2,
            found: 1
        })
    );
    let hole = Tree::leaf(Arith::Wildcard(HoleId::new(2)));
    assert_eq!(eval(&negate(hole)), Err(EvalError::Wildcard(HoleId::new(2))));
}

#[test]
fn display_uses_lowercase_operators() {
    let tree = add(constant(42), negate(constant(0)));
    assert_eq!(tree.to_string(), "add(42, neg(0))");
}

#[test]
fn fold_keeps_unfoldable_nodes() {
    let folder = folder().unwrap();
    let hole = Tree::leaf(Arith::Wildcard(HoleId::new(0)));
    let tree = add(hole.clone(), constant(5));
    let folded = folder.optimize(&tree).unwrap();
    assert!(Tree::ptr_eq(&folded, &tree));

    let tree = multiply(hole.clone(), add(constant(2), constant(3)));
    assert_eq!(folder.optimize(&tree), Ok(multiply(hole, constant(5))));
}

#[test]
fn identity_rules_beat_folding() {
    let folder = folder().unwrap();
    let tree = add(constant(7), constant(0));
    let folded = folder.optimize(&tree).unwrap();
    // The rule returns the bound operand itself; folding would build a
    // fresh constant.
    assert!(Tree::ptr_eq(&folded, &tree.children()[0]));
}
