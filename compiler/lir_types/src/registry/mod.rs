//! Uniquing registry.
//!
//! Maps structural keys to the one instance carrying that structure.
//!
//! # Tables
//!
//! - **canonical**: keys built entirely from concrete components. These are
//!   final and are the registry proper.
//! - **provisional**: keys of abstract composites. Their structure can still
//!   change under refinement, so every entry is removed before the node's
//!   slots are rewritten and re-inserted (or promoted) afterwards.
//!
//! Every registered node is also bucketed by shape hash so refinement can
//! find isomorphic candidates when keys alone cannot (cyclic types).

use rustc_hash::FxHashMap;

use crate::key::TypeKey;
use crate::Idx;

/// Which table an entry lives in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Table {
    Canonical,
    Provisional,
}

/// Structural-key to instance mapping, scoped per kind by the key variant.
#[derive(Default)]
pub(crate) struct Registry {
    canonical: FxHashMap<TypeKey, Idx>,
    provisional: FxHashMap<TypeKey, Idx>,
    /// Current key and table of every registered node.
    entries: FxHashMap<Idx, (TypeKey, Table)>,
    by_shape: FxHashMap<u64, Vec<Idx>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Find the instance registered under `key` in either table.
    pub(crate) fn lookup(&self, key: &TypeKey) -> Option<Idx> {
        self.canonical
            .get(key)
            .or_else(|| self.provisional.get(key))
            .copied()
    }

    /// Register `idx` under `key`.
    ///
    /// The caller must have checked that no entry for `key` exists.
    pub(crate) fn insert(&mut self, idx: Idx, key: TypeKey, table: Table) {
        debug_assert!(self.lookup(&key).is_none(), "duplicate registry key");
        debug_assert!(!self.entries.contains_key(&idx), "{idx:?} registered twice");

        self.by_shape.entry(key.shape_hash()).or_default().push(idx);
        match table {
            Table::Canonical => self.canonical.insert(key.clone(), idx),
            Table::Provisional => self.provisional.insert(key.clone(), idx),
        };
        self.entries.insert(idx, (key, table));
    }

    /// Unregister `idx`, returning the key it was stored under.
    pub(crate) fn remove(&mut self, idx: Idx) -> Option<TypeKey> {
        let (key, table) = self.entries.remove(&idx)?;
        let map = match table {
            Table::Canonical => &mut self.canonical,
            Table::Provisional => &mut self.provisional,
        };
        if map.get(&key) == Some(&idx) {
            map.remove(&key);
        }
        let hash = key.shape_hash();
        if let Some(bucket) = self.by_shape.get_mut(&hash) {
            bucket.retain(|&other| other != idx);
            if bucket.is_empty() {
                self.by_shape.remove(&hash);
            }
        }
        Some(key)
    }

    /// Move a provisional entry into the canonical table.
    ///
    /// Returns the existing canonical instance if the key is already taken
    /// there; the entry then stays provisional.
    pub(crate) fn promote(&mut self, idx: Idx) -> Result<(), Idx> {
        let Some((key, table)) = self.entries.get_mut(&idx) else {
            return Ok(());
        };
        if *table == Table::Canonical {
            return Ok(());
        }
        if let Some(&existing) = self.canonical.get(key) {
            return Err(existing);
        }
        self.provisional.remove(key);
        self.canonical.insert(key.clone(), idx);
        *table = Table::Canonical;
        Ok(())
    }

    /// The key `idx` is currently registered under.
    pub(crate) fn key_of(&self, idx: Idx) -> Option<&TypeKey> {
        self.entries.get(&idx).map(|(key, _)| key)
    }

    /// The table `idx` is currently registered in.
    pub(crate) fn table_of(&self, idx: Idx) -> Option<Table> {
        self.entries.get(&idx).map(|&(_, table)| table)
    }

    /// Registered nodes whose key has the given shape hash.
    pub(crate) fn shape_candidates(&self, hash: u64) -> &[Idx] {
        self.by_shape.get(&hash).map_or(&[], Vec::as_slice)
    }

    /// Number of canonical entries.
    pub(crate) fn canonical_len(&self) -> usize {
        self.canonical.len()
    }

    /// Number of provisional entries.
    pub(crate) fn provisional_len(&self) -> usize {
        self.provisional.len()
    }
}
