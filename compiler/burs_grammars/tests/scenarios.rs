//! End-to-end behavior of the sample rule sets.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use burs::{RewriteError, Tree};
use burs_grammars::arith::{self, add, constant, multiply, negate};
use burs_grammars::calc::{self, lit, plus, times};
use burs_grammars::ir::Ir;
use burs_grammars::logic::{self, and, falsity, not, or, truth, var, Env};
use burs_grammars::strings::{self, concat, empty, literal, to_lower, to_upper};
use burs_grammars::init_tracing;

#[test]
fn arithmetic_simplification() {
    init_tracing();
    let simplifier = arith::simplifier().expect("valid rule set");

    let input = add(constant(42), constant(0));
    let output = simplifier.optimize(&input).unwrap();
    assert_eq!(output, constant(42));
    assert_eq!(arith::eval(&input), Ok(42));
    assert_eq!(arith::eval(&output), Ok(42));

    let input = multiply(add(constant(0), constant(7)), constant(1));
    assert_eq!(simplifier.optimize(&input), Ok(constant(7)));
}

#[test]
fn simplifier_leaves_other_arithmetic_alone() {
    init_tracing();
    let simplifier = arith::simplifier().expect("valid rule set");
    let input = add(constant(2), negate(negate(multiply(constant(3), constant(1)))));
    assert_eq!(simplifier.optimize(&input), Ok(add(constant(2), constant(3))));
}

#[test]
fn folding_reaches_a_constant_in_one_call() {
    init_tracing();
    let folder = arith::folder().expect("valid rule set");
    let input = multiply(
        add(constant(2), negate(constant(5))),
        add(constant(4), constant(0)),
    );
    assert_eq!(folder.optimize(&input), Ok(constant(-12)));
}

#[test]
fn no_match_is_irreducible() {
    init_tracing();
    let rewriter = calc::additive().expect("valid rule set").build();
    let input = plus(lit(1), times(lit(2), lit(3)));
    assert_eq!(
        rewriter.rewrite(&input),
        Err(RewriteError::Irreducible {
            kind: "Times".to_owned(),
            arity: 2,
        })
    );
    // Trees without `Times` still lower.
    assert_eq!(
        rewriter.rewrite(&plus(lit(1), lit(2))),
        Ok(Ir::inc(Ir::Imm(2)))
    );
}

#[test]
fn fallback_rescues_unmatched_nodes() {
    init_tracing();
    let mut builder = calc::additive().expect("valid rule set");
    calc::add_deferral(&mut builder).expect("valid fallback");
    let rewriter = builder.build();

    let product = times(lit(2), lit(3));
    let input = plus(lit(1), product.clone());
    let output = rewriter.rewrite(&input).unwrap();

    assert_eq!(output, Ir::inc(Ir::Deferred(product)));
    assert_eq!(output.eval(), calc::eval(&input));
    assert_eq!(output.eval(), Ok(7));
}

#[test]
fn deferral_is_a_last_resort() {
    init_tracing();
    let mut builder = calc::additive().expect("valid rule set");
    calc::add_multiplication(&mut builder).expect("valid rule set");
    calc::add_deferral(&mut builder).expect("valid fallback");
    let rewriter = builder.build();

    let output = rewriter.rewrite(&times(lit(2), plus(lit(3), lit(4)))).unwrap();
    assert_eq!(output, Ir::shift_left(Ir::sum(Ir::Imm(3), Ir::Imm(4)), 1));
}

#[test]
fn leaf_and_rule_precedence_on_strings() {
    init_tracing();
    let normalizer = strings::normalizer().expect("valid rule set");
    let input = concat([
        to_upper(to_lower(literal("FoO"))),
        to_lower(concat([empty(), empty()])),
        to_lower(to_upper(literal("bAr"))),
    ]);
    let output = normalizer.optimize(&input).unwrap();

    assert_eq!(
        output,
        concat([to_upper(literal("FoO")), to_lower(literal("bAr"))])
    );
    assert_eq!(strings::eval(&output), strings::eval(&input));
    assert_eq!(strings::eval(&output), Ok("FOObar".to_owned()));
}

#[test]
fn empty_concat_becomes_the_empty_literal() {
    init_tracing();
    let normalizer = strings::normalizer().expect("valid rule set");
    assert_eq!(normalizer.optimize(&concat([])), Ok(empty()));
    assert_eq!(
        normalizer.optimize(&concat([empty(), to_upper(empty())])),
        Ok(empty())
    );
}

#[test]
fn logic_is_reduced_one_pass_at_a_time() {
    init_tracing();
    let simplifier = logic::simplifier().expect("valid rule set");

    let input = or(not(falsity()), not(truth()));
    let once = simplifier.optimize(&input).unwrap();
    assert_eq!(once, or(truth(), falsity()));

    let twice = simplifier.optimize(&once).unwrap();
    assert_eq!(twice, truth());

    let env = Env::default();
    assert_eq!(logic::eval(&input, &env), Ok(true));
    assert_eq!(logic::eval(&once, &env), Ok(true));
}

#[test]
fn logic_keeps_variables() {
    init_tracing();
    let simplifier = logic::simplifier().expect("valid rule set");
    let input = and(truth(), or(var("p"), falsity()));
    assert_eq!(simplifier.optimize(&input), Ok(var("p")));

    let untouched = and(var("p"), not(var("q")));
    let output = simplifier.optimize(&untouched).unwrap();
    assert!(Tree::ptr_eq(&output, &untouched));
}

#[test]
fn debug_view_describes_the_lowering() {
    init_tracing();
    let view = calc::lowering().expect("valid rule set").debug_view();
    assert!(view.contains("#0 Lit cost=0"));
    assert!(view.contains("#1 Plus($0, $1) cost=2 $0@[0] $1@[1]"));
    assert!(view.contains("Times/2 -> #4 #5 #6"));
}
