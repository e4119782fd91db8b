#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{add, mul, neg, num, Holes, Op, OpTag};

fn compile1(template: impl FnOnce(Tree<Op>) -> Tree<Op>) -> Result<CompiledPattern<Op>, ConfigError> {
    compile_template::<Op, 1>(&Holes, |[a]| template(a))
}

fn compile2(
    template: impl FnOnce(Tree<Op>, Tree<Op>) -> Tree<Op>,
) -> Result<CompiledPattern<Op>, ConfigError> {
    compile_template::<Op, 2>(&Holes, |[a, b]| template(a, b))
}

// Lowering

#[test]
fn ground_pattern_has_no_holes() {
    let compiled = compile_template::<Op, 0>(&Holes, |[]| add(num(1), num(2))).unwrap();
    assert_eq!(compiled.arity(), 0);
    assert!(compiled.traversals().is_empty());
    assert_eq!(format!("{:?}", compiled.pattern()), "Add(Num(1), Num(2))");
    assert_eq!(compiled.ground(), Some(&add(num(1), num(2))));
}

#[test]
fn holes_become_explicit_pattern_nodes() {
    let compiled = compile1(|x| add(x, num(0))).unwrap();
    assert_eq!(
        compiled.pattern(),
        &Pattern::Node {
            kind: Op::Add,
            children: vec![
                Pattern::Hole(HoleId::new(0)),
                Pattern::Node {
                    kind: Op::Num(0),
                    children: vec![],
                },
            ],
        }
    );
    assert_eq!(format!("{:?}", compiled.pattern()), "Add($0, Num(0))");
    assert!(compiled.ground().is_none());
}

#[test]
fn traversals_record_child_paths() {
    let compiled = compile2(|x, y| add(neg(y), mul(num(2), x))).unwrap();
    let paths: Vec<(HoleId, Vec<u32>)> = compiled
        .traversals()
        .iter()
        .map(|(hole, path)| (hole, path.to_vec()))
        .collect();
    assert_eq!(
        paths,
        vec![(HoleId::new(0), vec![1, 1]), (HoleId::new(1), vec![0, 0])]
    );
}

#[test]
fn shape_is_taken_from_the_root() {
    let compiled = compile2(|x, y| mul(x, y)).unwrap();
    assert_eq!(
        compiled.shape(),
        Shape {
            tag: OpTag::Mul,
            arity: 2
        }
    );
}

// Validation

#[test]
fn unused_wildcard_is_rejected() {
    let err = compile1(|_| add(num(1), num(0))).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnusedWildcard {
            hole: HoleId::new(0)
        }
    );
}

#[test]
fn second_unused_wildcard_is_rejected() {
    let err = compile2(|x, _| neg(x)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnusedWildcard {
            hole: HoleId::new(1)
        }
    );
}

#[test]
fn repeated_wildcard_is_rejected() {
    let err = compile1(|x| add(x.clone(), x)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::RepeatedWildcard {
            hole: HoleId::new(0)
        }
    );
}

#[test]
fn wildcard_root_is_rejected() {
    let err = compile1(|x| x).unwrap_err();
    assert_eq!(err, ConfigError::WildcardRoot);
}

#[test]
fn stray_wildcard_is_rejected() {
    let stray = Tree::leaf(Op::Hole(HoleId::new(2)));
    let err = compile1(|x| add(x, stray)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::StrayWildcard {
            hole: HoleId::new(2),
            arity: 1
        }
    );
}

// Traversal maps

#[test]
fn merge_keeps_holes_sorted() {
    let left = WildcardTraversalMap::singleton(HoleId::new(2)).under(0);
    let right = WildcardTraversalMap::singleton(HoleId::new(0)).under(1);
    let merged = left.merge(right).unwrap();
    let holes: Vec<HoleId> = merged.iter().map(|(hole, _)| hole).collect();
    assert_eq!(holes, vec![HoleId::new(0), HoleId::new(2)]);
    assert_eq!(merged.get(HoleId::new(2)), Some(&[0][..]));
    assert_eq!(merged.get(HoleId::new(1)), None);
}

#[test]
fn merge_rejects_duplicate_identity() {
    let left = WildcardTraversalMap::singleton(HoleId::new(1)).under(0);
    let right = WildcardTraversalMap::singleton(HoleId::new(1)).under(1);
    assert_eq!(
        left.merge(right),
        Err(ConfigError::RepeatedWildcard {
            hole: HoleId::new(1)
        })
    );
}

#[test]
fn under_prefixes_nested_paths() {
    let map = WildcardTraversalMap::singleton(HoleId::new(0))
        .under(3)
        .under(1);
    assert_eq!(map.get(HoleId::new(0)), Some(&[1, 3][..]));
}

#[test]
fn hole_display_uses_dollar_prefix() {
    assert_eq!(HoleId::new(7).to_string(), "$7");
    assert_eq!(HoleId::new(7).index(), 7);
}
