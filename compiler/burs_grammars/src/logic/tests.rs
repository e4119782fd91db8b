#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

fn env(bindings: &[(&str, bool)]) -> Env {
    bindings
        .iter()
        .map(|(name, value)| ((*name).to_owned(), *value))
        .collect()
}

#[test]
fn eval_with_variables() {
    let env = env(&[("a", true), ("b", false)]);
    assert_eq!(eval(&and(var("a"), not(var("b"))), &env), Ok(true));
    assert_eq!(eval(&or(var("b"), boolean(false)), &env), Ok(false));
}

#[test]
fn unbound_variable_is_reported_without_short_circuit() {
    let env = env(&[("a", false)]);
    assert_eq!(
        eval(&and(var("a"), var("zz")), &env),
        Err(EvalError::UnboundVariable("zz".to_owned()))
    );
}

#[test]
fn malformed_not_is_rejected() {
    let tree = Tree::new(Logic::Not, [truth(), falsity()]);
    assert_eq!(
        eval(&tree, &Env::default()),
        Err(EvalError::Arity {
            kind: "Not",
            expected: 1,
            found: 2
        })
    );
}

#[test]
fn display() {
    let tree = or(not(var("x")), and(truth(), falsity()));
    assert_eq!(tree.to_string(), "Or(Not(x), And(True, False))");
}

#[test]
fn simplification_can_drop_unbound_variables() {
    let simplifier = simplifier().unwrap();
    let input = and(falsity(), var("zz"));
    let simplified = simplifier.optimize(&input).unwrap();
    assert_eq!(simplified, falsity());

    let partial = Env::default();
    assert_eq!(
        eval(&input, &partial),
        Err(EvalError::UnboundVariable("zz".to_owned()))
    );
    assert_eq!(eval(&simplified, &partial), Ok(false));

    let total = env(&[("zz", true)]);
    assert_eq!(eval(&input, &total), eval(&simplified, &total));
}
