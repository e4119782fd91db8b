#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn eval_concatenates_converted_parts() {
    let tree = concat([to_upper(literal("ab")), literal("-"), to_lower(literal("CD"))]);
    assert_eq!(eval(&tree), Ok("AB-cd".to_owned()));
    assert_eq!(eval(&concat([])), Ok(String::new()));
}

#[test]
fn blank_operands() {
    assert!(is_blank(&empty()));
    assert!(is_blank(&to_lower(to_upper(empty()))));
    assert!(!is_blank(&to_lower(literal(" "))));
    assert!(!is_blank(&concat([empty()])));
    assert!(!is_blank(&Tree::leaf(Str::Wildcard(HoleId::new(0)))));
}

#[test]
fn deeply_nested_concatenations_normalize() {
    let normalizer = normalizer().unwrap();

    let mut kept = literal("a");
    let mut blank = empty();
    for _ in 0..10_000 {
        kept = concat([kept, empty()]);
        blank = concat([to_upper(blank)]);
    }

    let mut expected = literal("a");
    for _ in 0..10_000 {
        expected = concat([expected]);
    }
    assert_eq!(normalizer.optimize(&kept), Ok(expected));
    assert_eq!(normalizer.optimize(&blank), Ok(empty()));
}

#[test]
fn display_quotes_literals() {
    let tree = concat([to_upper(literal("FoO")), empty()]);
    assert_eq!(tree.to_string(), r#"Concat(ToUpper("FoO"), "")"#);
}

#[test]
fn wildcards_do_not_evaluate() {
    assert_eq!(
        eval(&to_upper(Tree::leaf(Str::Wildcard(HoleId::new(1))))),
        Err(EvalError::Wildcard(HoleId::new(1)))
    );
}
