//! Shape index over registered entries.
//!
//! Rules are bucketed by the shape of their pattern root, keyed in a
//! two-level [`NAryMap`]: first the root tag, then the child count. A node
//! only ever meets the rules of its own shape; a rule rooted at `Add/2`
//! costs nothing when labeling a `Neg/1` node.
//!
//! Leaves match by tag alone, whatever the child count, and live in a
//! separate per-tag map. Buckets preserve registration order.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::NAryMapError;
use crate::nary_map::NAryMap;
use crate::table::{LeafId, RuleId};
use crate::tree::Shape;

/// One segment of a shape key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ShapeSegment<G> {
    Tag(G),
    Arity(usize),
}

pub(crate) type RuleBucket = SmallVec<[RuleId; 4]>;
pub(crate) type LeafBucket = SmallVec<[LeafId; 2]>;

pub(crate) struct ShapeIndex<G> {
    rules: NAryMap<ShapeSegment<G>, RuleBucket>,
    leaves: FxHashMap<G, LeafBucket>,
    /// Tags in the order their first leaf was registered.
    leaf_tags: Vec<G>,
}

impl<G: Copy + Eq + Hash> ShapeIndex<G> {
    pub(crate) fn new() -> Self {
        ShapeIndex {
            rules: NAryMap::new(2),
            leaves: FxHashMap::default(),
            leaf_tags: Vec::new(),
        }
    }

    pub(crate) fn insert_rule(&mut self, shape: Shape<G>, id: RuleId) -> Result<(), NAryMapError> {
        self.rules
            .get_or_insert_with(&key(shape), RuleBucket::new)?
            .push(id);
        Ok(())
    }

    pub(crate) fn insert_leaf(&mut self, tag: G, id: LeafId) {
        let bucket = self.leaves.entry(tag).or_insert_with(|| {
            self.leaf_tags.push(tag);
            LeafBucket::new()
        });
        bucket.push(id);
    }

    pub(crate) fn rules_for(&self, shape: Shape<G>) -> &[RuleId] {
        match self.rules.try_get(&key(shape)) {
            Ok(Some(bucket)) => bucket.as_slice(),
            Ok(None) => &[],
            Err(err) => {
                debug_assert!(false, "shape keys always have two segments: {err}");
                &[]
            }
        }
    }

    pub(crate) fn leaves_for(&self, tag: G) -> &[LeafId] {
        self.leaves.get(&tag).map_or(&[][..], SmallVec::as_slice)
    }

    /// Rule buckets by shape, in first-registration order.
    pub(crate) fn rule_buckets(&self) -> impl Iterator<Item = (Shape<G>, &[RuleId])> + '_ {
        self.rules.iter().filter_map(|(key, bucket)| match key {
            [ShapeSegment::Tag(tag), ShapeSegment::Arity(arity)] => Some((
                Shape {
                    tag: *tag,
                    arity: *arity,
                },
                bucket.as_slice(),
            )),
            _ => None,
        })
    }

    /// Leaf buckets by tag, in first-registration order.
    pub(crate) fn leaf_buckets(&self) -> impl Iterator<Item = (G, &[LeafId])> + '_ {
        self.leaf_tags
            .iter()
            .map(|tag| (*tag, self.leaves_for(*tag)))
    }
}

fn key<G>(shape: Shape<G>) -> [ShapeSegment<G>; 2] {
    [ShapeSegment::Tag(shape.tag), ShapeSegment::Arity(shape.arity)]
}
