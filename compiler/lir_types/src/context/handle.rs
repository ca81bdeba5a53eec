//! Contained-type slots.
//!
//! A slot is the (owner, target) edge a composite holds to one of its
//! component types. While the target is abstract, the owner is counted in
//! the target's user set once per slot. Retargeting always releases the
//! old target before acquiring the new one, and neither step can fail, so
//! an owner is never left registered with a target it no longer holds.

use super::{AbstractUser, TypeContext};
use crate::Idx;

impl TypeContext {
    /// Count `user` as an observer of `target` if `target` is abstract.
    pub(crate) fn acquire(&mut self, user: AbstractUser, target: Idx) {
        let node = self.raw_mut(target);
        if node.flags.is_abstract() && !node.flags.is_retired() {
            *node.users.entry(user).or_insert(0) += 1;
        }
    }

    /// Drop one count of `user` from `target`'s observers.
    ///
    /// A no-op when `target` is concrete: becoming concrete clears the whole
    /// user set at once.
    pub(crate) fn release(&mut self, user: AbstractUser, target: Idx) {
        let users = &mut self.raw_mut(target).users;
        if let Some(count) = users.get_mut(&user) {
            *count -= 1;
            if *count == 0 {
                users.remove(&user);
            }
        }
    }

    /// Append a slot pointing at `target` to `owner`.
    pub(crate) fn attach_slot(&mut self, owner: Idx, target: Idx) {
        self.raw_mut(owner).contained.push(target);
        self.acquire(AbstractUser::Type(owner), target);
    }

    /// Point slot `slot` of `owner` at `new`.
    pub(crate) fn retarget_slot(&mut self, owner: Idx, slot: usize, new: Idx) {
        let old = self.raw(owner).contained[slot];
        if old == new {
            return;
        }
        self.release(AbstractUser::Type(owner), old);
        self.raw_mut(owner).contained[slot] = new;
        self.acquire(AbstractUser::Type(owner), new);
    }

    /// Release every slot of `owner` without notifying anyone.
    ///
    /// Teardown step for a node that is being refined away: clearing its
    /// outgoing edges first means no cycle through it can re-enter it.
    pub(crate) fn drop_all_type_uses(&mut self, owner: Idx) {
        self.registry.remove(owner);
        let slots = std::mem::take(&mut self.raw_mut(owner).contained);
        for target in slots {
            self.release(AbstractUser::Type(owner), target);
        }
    }
}
