//! Abstract-type refinement.
//!
//! Refinement replaces every reference to an abstract type with a reference
//! to another type, then retires the abstract one.
//!
//! # Protocol
//!
//! 1. `refine_abstract_type_to(old, new)` forwards `old` to `new`, drops
//!    `old`'s own slots, and notifies every user of `old` until none remain.
//! 2. A composite user rewrites each slot that pointed at `old`, then
//!    re-uniques itself: if its new structure already exists it is in turn
//!    refined to the existing instance (depth-first, before the outer call
//!    returns); otherwise it is re-registered and checked for concreteness.
//! 3. A type that can no longer reach any opaque type is promoted: its
//!    registry entry becomes canonical and its own users are told it
//!    became concrete, which may promote them in turn.
//!
//! Notification order within one call is the sorted order of the user set.
//! A refinement runs to completion; there is no partial state to resume.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::context::AbstractUser;
use crate::key::TypeKey;
use crate::registry::Table;
use crate::{Idx, Tag, TypeContext, TypeFlags};

/// Grow the stack when less than this remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated per growth (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run a re-entrant refinement step with enough stack for long merge chains.
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

impl TypeContext {
    /// Replace every use of the abstract type `old` with `new` and retire `old`.
    ///
    /// `new` may itself be abstract; this is how self-referential types are
    /// built (`old` is an opaque placeholder and `new` a composite that
    /// contains it). Afterwards `old` has no users, and
    /// [`resolve`](Self::resolve)`(old)` yields the live replacement.
    ///
    /// # Panics
    /// Refinement misuse is a defect in the caller and aborts the operation:
    /// - `old` has already been refined away,
    /// - `old` is concrete,
    /// - `new` resolves to `old`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn refine_abstract_type_to(&mut self, old: Idx, new: Idx) {
        let flags = self.raw(old).flags;
        assert!(
            !flags.is_retired(),
            "refine_abstract_type_to: {old:?} has already been refined"
        );
        assert!(
            flags.is_abstract(),
            "refine_abstract_type_to: {old:?} is not abstract"
        );
        let new = self.resolve(new);
        assert_ne!(new, old, "refine_abstract_type_to: cannot refine a type to itself");

        // From here on stale handles forward to the replacement.
        let node = self.raw_mut(old);
        node.forward = Some(new);
        node.flags.insert(TypeFlags::IS_RETIRED);

        self.drop_all_type_uses(old);

        loop {
            let users = self.abstract_users(old);
            if users.is_empty() {
                break;
            }
            for user in users {
                // An earlier notification may already have moved this user.
                if !self.raw(old).users.contains_key(&user) {
                    continue;
                }
                let target = self.resolve(new);
                ensure_sufficient_stack(|| self.refine_user(user, old, target));
            }
        }

        let node = self.raw_mut(old);
        node.flags.remove(TypeFlags::IS_ABSTRACT);
        debug_assert!(node.users.is_empty());
        tracing::debug!(?old, new = ?self.resolve(new), "refinement complete");
    }

    /// Deliver one refinement notification.
    fn refine_user(&mut self, user: AbstractUser, old: Idx, new: Idx) {
        match user {
            AbstractUser::Type(owner) => self.refine_abstract_type(owner, old, new),
            AbstractUser::Listener(id) => self.refine_listener(id, old, new),
        }
    }

    /// Rewrite `owner`'s slots that point at `old` to point at `new`, then
    /// re-unique `owner`.
    fn refine_abstract_type(&mut self, owner: Idx, old: Idx, new: Idx) {
        assert!(
            self.raw(owner).tag != Tag::Opaque,
            "opaque type {owner:?} cannot observe {old:?}: it has no contained types"
        );
        tracing::trace!(?owner, ?old, ?new, "retargeting contained types");

        self.registry.remove(owner);
        for slot in 0..self.raw(owner).contained.len() {
            if self.raw(owner).contained[slot] == old {
                self.retarget_slot(owner, slot, new);
            }
        }

        let key = self.key_of_node(owner);
        if let Some(existing) = self.find_equivalent(owner, &key) {
            tracing::debug!(?owner, ?existing, "refined type collapses into existing type");
            // `owner` observed an abstract type, so it is still abstract.
            ensure_sufficient_stack(|| self.refine_abstract_type_to(owner, existing));
            return;
        }

        self.registry.insert(owner, key, Table::Provisional);
        self.promote_abstract_to_concrete(owner);
    }

    /// A component of `owner` that was abstract is now concrete.
    fn type_became_concrete(&mut self, owner: Idx, component: Idx) {
        assert!(
            self.raw(owner).tag != Tag::Opaque,
            "opaque type {owner:?} cannot observe {component:?}: it has no contained types"
        );
        tracing::trace!(?owner, ?component, "component became concrete");
        self.promote_abstract_to_concrete(owner);
    }

    /// Tell every user of `ty` that `ty` is now concrete, unregistering them.
    pub(crate) fn notify_uses_that_type_became_concrete(&mut self, ty: Idx) {
        let users = self.abstract_users(ty);
        self.raw_mut(ty).users.clear();
        for user in users {
            match user {
                AbstractUser::Type(owner) => {
                    ensure_sufficient_stack(|| self.type_became_concrete(owner, ty));
                }
                AbstractUser::Listener(id) => self.listener_became_concrete(id, ty),
            }
        }
    }

    /// Promote `start` and everything it reaches if none of it can reach an
    /// opaque type (or a type whose refinement is still in flight).
    fn promote_abstract_to_concrete(&mut self, start: Idx) {
        if !self.raw(start).flags.is_abstract() {
            return;
        }

        let mut visited = FxHashSet::default();
        let mut abstract_nodes = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            let node = self.raw(idx);
            if node.flags.contains(TypeFlags::IS_OPAQUE) || node.flags.is_retired() {
                return;
            }
            if !node.flags.is_abstract() {
                continue;
            }
            abstract_nodes.push(idx);
            stack.extend(node.contained.iter().copied());
        }

        // Nothing reachable from `start` is abstract, so nothing reachable
        // from any visited node is either.
        for &idx in &abstract_nodes {
            self.raw_mut(idx).flags.remove(TypeFlags::IS_ABSTRACT);
        }
        for &idx in &abstract_nodes {
            if let Err(existing) = self.registry.promote(idx) {
                tracing::warn!(?idx, ?existing, "concrete type shadows canonical entry");
            }
        }
        tracing::debug!(count = abstract_nodes.len(), "promoted abstract types to concrete");
        for idx in abstract_nodes {
            self.notify_uses_that_type_became_concrete(idx);
        }
    }

    /// Find a registered type other than `owner` that is structurally equal.
    fn find_equivalent(&self, owner: Idx, key: &TypeKey) -> Option<Idx> {
        if let Some(hit) = self.registry.lookup(key) {
            if hit != owner {
                return Some(hit);
            }
        }
        if !self.has_cycle_through(owner) {
            return None;
        }
        self.registry
            .shape_candidates(key.shape_hash())
            .iter()
            .copied()
            .find(|&candidate| {
                candidate != owner
                    && self
                        .registry
                        .key_of(candidate)
                        .is_some_and(|other| other.same_shape(key))
                    && self.types_equal(owner, candidate)
            })
    }

    /// Check if `start` can reach itself through its contained types.
    fn has_cycle_through(&self, start: Idx) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<Idx> = self.raw(start).contained.to_vec();
        while let Some(idx) = stack.pop() {
            let idx = self.resolve(idx);
            if idx == start {
                return true;
            }
            if visited.insert(idx) {
                stack.extend(self.raw(idx).contained.iter().copied());
            }
        }
        false
    }

    /// Coinductive structural equality: a pair under comparison is assumed
    /// equal, so isomorphic cycles compare equal.
    pub(crate) fn types_equal(&self, a: Idx, b: Idx) -> bool {
        let mut assumed: FxHashMap<Idx, Idx> = FxHashMap::default();
        let mut work = vec![(a, b)];
        while let Some((x, y)) = work.pop() {
            let (x, y) = (self.resolve(x), self.resolve(y));
            if x == y {
                continue;
            }
            let (nx, ny) = (self.raw(x), self.raw(y));
            // Primitives and integers are unique per shape, and two distinct
            // opaque types are never equal.
            if nx.tag != ny.tag || !nx.tag.is_uniqued() || nx.tag == Tag::Integer {
                return false;
            }
            match assumed.get(&x) {
                Some(&prev) if prev == y => continue,
                Some(_) => return false,
                None => {
                    assumed.insert(x, y);
                }
            }
            if nx.data != ny.data
                || nx.extra != ny.extra
                || nx.contained.len() != ny.contained.len()
            {
                return false;
            }
            work.extend(nx.contained.iter().copied().zip(ny.contained.iter().copied()));
        }
        true
    }
}
