//! Fixed-arity trie.
//!
//! Every key of an [`NAryMap`] is a sequence of exactly `arity` segments.
//! Lookups walk one trie level per segment, so a map keyed on
//! `[tag, child count]` answers "which entries have this shape" without
//! looking at entries of any other shape.
//!
//! Values live in a side vector in insertion order; trie nodes only store
//! the index of their value. Iteration therefore reports entries in the
//! order they were first inserted, which keeps diagnostic dumps stable.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::errors::NAryMapError;

/// Map from fixed-length key sequences to values.
#[derive(Clone, Debug)]
pub struct NAryMap<K, V> {
    arity: usize,
    root: TrieNode<K>,
    entries: Vec<(Box<[K]>, V)>,
}

#[derive(Clone, Debug)]
struct TrieNode<K> {
    children: FxHashMap<K, TrieNode<K>>,
    /// Index into `NAryMap::entries`; only set at depth `arity`.
    slot: Option<usize>,
}

impl<K> TrieNode<K> {
    fn new() -> Self {
        TrieNode {
            children: FxHashMap::default(),
            slot: None,
        }
    }
}

impl<K: Clone + Eq + Hash, V> NAryMap<K, V> {
    pub fn new(arity: usize) -> Self {
        NAryMap {
            arity,
            root: TrieNode::new(),
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: &[K], value: V) -> Result<Option<V>, NAryMapError> {
        self.check_arity(key)?;
        let slot = Self::slot_mut(&mut self.root, key);
        match *slot {
            Some(index) => Ok(Some(std::mem::replace(&mut self.entries[index].1, value))),
            None => {
                *slot = Some(self.entries.len());
                self.entries.push((key.into(), value));
                Ok(None)
            }
        }
    }

    /// The value under `key`, inserting `make()` first if absent.
    pub fn get_or_insert_with(
        &mut self,
        key: &[K],
        make: impl FnOnce() -> V,
    ) -> Result<&mut V, NAryMapError> {
        self.check_arity(key)?;
        let slot = Self::slot_mut(&mut self.root, key);
        let index = match *slot {
            Some(index) => index,
            None => {
                let index = self.entries.len();
                *slot = Some(index);
                self.entries.push((key.into(), make()));
                index
            }
        };
        Ok(&mut self.entries[index].1)
    }

    /// Lookup that reports an absent key as `Ok(None)`.
    pub fn try_get(&self, key: &[K]) -> Result<Option<&V>, NAryMapError> {
        self.check_arity(key)?;
        Ok(self.find(key).map(|index| &self.entries[index].1))
    }

    /// Lookup that reports an absent key as [`NAryMapError::NotFound`].
    pub fn get(&self, key: &[K]) -> Result<&V, NAryMapError> {
        self.try_get(key)?.ok_or(NAryMapError::NotFound)
    }

    pub fn get_mut(&mut self, key: &[K]) -> Result<&mut V, NAryMapError> {
        self.check_arity(key)?;
        match self.find(key) {
            Some(index) => Ok(&mut self.entries[index].1),
            None => Err(NAryMapError::NotFound),
        }
    }

    pub fn contains_key(&self, key: &[K]) -> Result<bool, NAryMapError> {
        Ok(self.try_get(key)?.is_some())
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[K], &V)> + '_ {
        self.entries.iter().map(|(key, value)| (&**key, value))
    }

    fn check_arity(&self, key: &[K]) -> Result<(), NAryMapError> {
        if key.len() == self.arity {
            Ok(())
        } else {
            Err(NAryMapError::ArityMismatch {
                expected: self.arity,
                found: key.len(),
            })
        }
    }

    fn find(&self, key: &[K]) -> Option<usize> {
        let mut node = &self.root;
        for segment in key {
            node = node.children.get(segment)?;
        }
        node.slot
    }

    fn slot_mut<'a>(root: &'a mut TrieNode<K>, key: &[K]) -> &'a mut Option<usize> {
        let mut node = root;
        for segment in key {
            node = node
                .children
                .entry(segment.clone())
                .or_insert_with(TrieNode::new);
        }
        &mut node.slot
    }
}
