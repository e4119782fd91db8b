//! Registered leaves, rules and fallbacks.
//!
//! `RuleTables` owns every registered entry plus the [`ShapeIndex`] over
//! them. Entries are addressed by typed ids (indices into their table's
//! vector) and carry a registration ordinal shared across all three tables;
//! `(cost, ordinal)` is the selection key, so the first-registered entry
//! wins among equal costs regardless of which table it sits in.
//!
//! # Invariants
//!
//! - `LeafId`/`RuleId`/`FallbackId` index `leaves`/`rules`/`fallbacks`.
//! - Ordinals are strictly increasing in registration order.
//! - Every stored cost is non-negative.

use crate::engine::ReduceContext;
use crate::errors::{ConfigError, RewriteError};
use crate::index::ShapeIndex;
use crate::pattern::CompiledPattern;
use crate::tree::{NodeKind, Shape, Tree};

/// Static weight of a conversion. Lower is preferred.
pub type Cost = i32;

macro_rules! entry_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub(crate) struct $name(u32);

        impl $name {
            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }

            #[expect(
                clippy::cast_possible_truncation,
                reason = "tables hold far fewer than u32::MAX entries"
            )]
            fn from_index(index: usize) -> Self {
                $name(index as u32)
            }
        }
    };
}

entry_id!(
    /// Index into `RuleTables::leaves`.
    LeafId
);
entry_id!(
    /// Index into `RuleTables::rules`.
    RuleId
);
entry_id!(
    /// Index into `RuleTables::fallbacks`.
    FallbackId
);

pub(crate) type Predicate<S> = Box<dyn Fn(&Tree<S>) -> bool + Send + Sync>;

pub(crate) type Convert<S, D> =
    Box<dyn Fn(&ReduceContext<'_, S, D>) -> Result<D, RewriteError> + Send + Sync>;

/// Right-hand side of a rule, one variant per hole count.
pub(crate) enum Goal<D> {
    Nullary(Box<dyn Fn() -> D + Send + Sync>),
    Unary(Box<dyn Fn(D) -> D + Send + Sync>),
    Binary(Box<dyn Fn(D, D) -> D + Send + Sync>),
    Ternary(Box<dyn Fn(D, D, D) -> D + Send + Sync>),
}

pub(crate) struct Leaf<S: NodeKind, D> {
    pub tag: S::Tag,
    pub predicate: Option<Predicate<S>>,
    pub convert: Convert<S, D>,
    pub cost: Cost,
    pub ordinal: u32,
}

pub(crate) struct Rule<S: NodeKind, D> {
    pub pattern: CompiledPattern<S>,
    pub goal: Goal<D>,
    pub cost: Cost,
    pub ordinal: u32,
}

pub(crate) struct Fallback<S: NodeKind, D> {
    pub predicate: Option<Predicate<S>>,
    pub convert: Convert<S, D>,
    pub cost: Cost,
    pub ordinal: u32,
}

impl<S: NodeKind, D> Leaf<S, D> {
    pub(crate) fn accepts(&self, node: &Tree<S>) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(node))
    }
}

impl<S: NodeKind, D> Fallback<S, D> {
    pub(crate) fn accepts(&self, node: &Tree<S>) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(node))
    }
}

pub(crate) struct RuleTables<S: NodeKind, D> {
    leaves: Vec<Leaf<S, D>>,
    rules: Vec<Rule<S, D>>,
    fallbacks: Vec<Fallback<S, D>>,
    index: ShapeIndex<S::Tag>,
    next_ordinal: u32,
}

impl<S: NodeKind, D> RuleTables<S, D> {
    pub(crate) fn new() -> Self {
        RuleTables {
            leaves: Vec::new(),
            rules: Vec::new(),
            fallbacks: Vec::new(),
            index: ShapeIndex::new(),
            next_ordinal: 0,
        }
    }

    pub(crate) fn push_leaf(
        &mut self,
        tag: S::Tag,
        predicate: Option<Predicate<S>>,
        convert: Convert<S, D>,
        cost: Cost,
    ) -> Result<LeafId, ConfigError> {
        check_cost(cost)?;
        let id = LeafId::from_index(self.leaves.len());
        let ordinal = self.take_ordinal();
        self.index.insert_leaf(tag, id);
        self.leaves.push(Leaf {
            tag,
            predicate,
            convert,
            cost,
            ordinal,
        });
        Ok(id)
    }

    pub(crate) fn push_rule(
        &mut self,
        pattern: CompiledPattern<S>,
        goal: Goal<D>,
        cost: Cost,
    ) -> Result<RuleId, ConfigError> {
        check_cost(cost)?;
        let id = RuleId::from_index(self.rules.len());
        self.index.insert_rule(pattern.shape(), id)?;
        let ordinal = self.take_ordinal();
        self.rules.push(Rule {
            pattern,
            goal,
            cost,
            ordinal,
        });
        Ok(id)
    }

    pub(crate) fn push_fallback(
        &mut self,
        predicate: Option<Predicate<S>>,
        convert: Convert<S, D>,
        cost: Cost,
    ) -> Result<FallbackId, ConfigError> {
        check_cost(cost)?;
        let id = FallbackId::from_index(self.fallbacks.len());
        let ordinal = self.take_ordinal();
        self.fallbacks.push(Fallback {
            predicate,
            convert,
            cost,
            ordinal,
        });
        Ok(id)
    }

    #[inline]
    pub(crate) fn leaf(&self, id: LeafId) -> &Leaf<S, D> {
        &self.leaves[id.index()]
    }

    #[inline]
    pub(crate) fn rule(&self, id: RuleId) -> &Rule<S, D> {
        &self.rules[id.index()]
    }

    #[inline]
    pub(crate) fn fallback(&self, id: FallbackId) -> &Fallback<S, D> {
        &self.fallbacks[id.index()]
    }

    /// Leaves registered for `tag`, in registration order.
    pub(crate) fn leaves_for(&self, tag: S::Tag) -> &[LeafId] {
        self.index.leaves_for(tag)
    }

    /// Rules whose pattern root has `shape`, in registration order.
    pub(crate) fn rules_for(&self, shape: Shape<S::Tag>) -> &[RuleId] {
        self.index.rules_for(shape)
    }

    pub(crate) fn leaves(&self) -> impl Iterator<Item = (LeafId, &Leaf<S, D>)> + '_ {
        self.leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| (LeafId::from_index(i), leaf))
    }

    pub(crate) fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule<S, D>)> + '_ {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| (RuleId::from_index(i), rule))
    }

    pub(crate) fn fallbacks(&self) -> impl Iterator<Item = (FallbackId, &Fallback<S, D>)> + '_ {
        self.fallbacks
            .iter()
            .enumerate()
            .map(|(i, fallback)| (FallbackId::from_index(i), fallback))
    }

    pub(crate) fn index(&self) -> &ShapeIndex<S::Tag> {
        &self.index
    }

    fn take_ordinal(&mut self) -> u32 {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        ordinal
    }
}

pub(crate) fn check_cost(cost: Cost) -> Result<(), ConfigError> {
    if cost < 0 {
        return Err(ConfigError::NegativeCost { cost });
    }
    Ok(())
}
