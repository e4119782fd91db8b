use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::{add, mul, neg, num, Op, OpTag};

#[test]
fn accessors() {
    let tree = add(num(1), neg(num(2)));
    assert_eq!(tree.kind(), &Op::Add);
    assert_eq!(tree.arity(), 2);
    assert_eq!(tree.child(1).map(Tree::kind), Some(&Op::Neg));
    assert!(tree.child(2).is_none());
    assert_eq!(
        tree.shape(),
        Shape {
            tag: OpTag::Add,
            arity: 2
        }
    );
    assert_eq!(tree.shape().to_string(), "Add/2");
}

#[test]
fn size_and_depth() {
    let tree = add(num(1), neg(mul(num(2), num(3))));
    assert_eq!(tree.size(), 6);
    assert_eq!(tree.depth(), 4);
    assert_eq!(num(7).size(), 1);
    assert_eq!(num(7).depth(), 1);
}

#[test]
fn at_path_follows_child_indices() {
    let tree = add(num(1), neg(mul(num(2), num(3))));
    assert_eq!(tree.at_path(&[]).map(Tree::kind), Some(&Op::Add));
    assert_eq!(tree.at_path(&[1, 0, 1]), Some(&num(3)));
    assert!(tree.at_path(&[0, 0]).is_none());
}

#[test]
fn clone_shares_the_node() {
    let tree = add(num(1), num(2));
    let copy = tree.clone();
    assert!(Tree::ptr_eq(&tree, &copy));
    // Structurally equal, but a different node.
    assert!(!Tree::ptr_eq(&tree, &add(num(1), num(2))));
    assert_eq!(tree, add(num(1), num(2)));
}

#[test]
fn equality_is_structural() {
    assert_ne!(add(num(1), num(2)), add(num(2), num(1)));
    assert_ne!(add(num(1), num(2)), mul(num(1), num(2)));
    assert_ne!(neg(num(1)), Tree::new(Op::Neg, [num(1), num(1)]));
}

struct AnyNum;

impl KindComparer<Op> for AnyNum {
    fn kind_eq(&self, a: &Op, b: &Op) -> bool {
        matches!((a, b), (Op::Num(_), Op::Num(_))) || a == b
    }
}

#[test]
fn eq_with_uses_the_comparer() {
    let a = add(num(1), neg(num(2)));
    let b = add(num(8), neg(num(9)));
    assert!(a.eq_with(&b, &AnyNum));
    assert!(!a.eq_with(&b, &ValueComparer));
    assert!(!a.eq_with(&mul(num(1), neg(num(2))), &AnyNum));
}

#[test]
fn recursive_comparer_walks_with_the_kind_comparer() {
    let a = add(num(1), neg(num(2)));
    let b = add(num(8), neg(num(9)));
    assert!(RecursiveComparer.tree_eq(&a, &b, &AnyNum));
    assert!(!RecursiveComparer.tree_eq(&a, &b, &ValueComparer));
    assert!(RecursiveComparer.tree_eq(&a, &a.clone(), &ValueComparer));
}

#[test]
fn update_keeps_kind_and_replaces_children() {
    let tree = mul(num(1), num(2));
    let updated = tree.update([num(3), num(4)]);
    assert_eq!(updated, mul(num(3), num(4)));
    assert!(!Tree::ptr_eq(&tree, &updated));
}

#[test]
fn debug_rendering() {
    let tree = add(num(42), neg(num(0)));
    assert_eq!(format!("{tree:?}"), "Add(Num(42), Neg(Num(0)))");
    assert_eq!(format!("{:?}", num(3)), "Num(3)");
}

#[derive(Clone, Debug, PartialEq)]
enum Word {
    Cat,
    Lit(&'static str),
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Word::Cat => f.write_str("cat"),
            Word::Lit(s) => write!(f, "{s:?}"),
        }
    }
}

#[test]
fn display_rendering() {
    let tree = Tree::new(
        Word::Cat,
        [Tree::leaf(Word::Lit("a")), Tree::leaf(Word::Lit("b"))],
    );
    assert_eq!(tree.to_string(), r#"cat("a", "b")"#);
}

#[test]
fn deep_tree_walks_and_drops() {
    let mut tree = num(0);
    for _ in 0..100_000 {
        tree = neg(tree);
    }
    assert_eq!(tree.depth(), 100_001);
    assert_eq!(tree.size(), 100_001);
    assert_eq!(tree, tree.clone());
    drop(tree);
}
