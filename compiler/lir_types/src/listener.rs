//! External abstract-type listeners.
//!
//! Code outside the type graph (a parser's symbol table, a module under
//! construction) can hold on to an abstract type and be told when it is
//! refined or becomes concrete. A subscription follows its type across
//! refinements for as long as the type stays abstract and is released from
//! the observer set once its target is concrete; the listener itself stays
//! owned by the context until [`TypeContext::unsubscribe`].

use crate::context::AbstractUser;
use crate::{Idx, TypeContext};

/// Callbacks for an external observer of an abstract type.
pub trait AbstractTypeListener: Send + Sync {
    /// Every use of `old` is being replaced by `new`.
    fn refine_abstract_type(&mut self, old: Idx, new: Idx);

    /// `ty` no longer contains any abstract type.
    fn type_became_concrete(&mut self, ty: Idx);
}

/// Handle to a subscription.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListenerId(u32);

pub(crate) struct ListenerSlot {
    target: Idx,
    listener: Box<dyn AbstractTypeListener>,
}

impl TypeContext {
    /// Observe the abstract type `ty`.
    ///
    /// Returns `None` (and drops `listener`) when `ty` is already concrete:
    /// there is nothing left to observe.
    pub fn subscribe(
        &mut self,
        ty: Idx,
        listener: Box<dyn AbstractTypeListener>,
    ) -> Option<ListenerId> {
        let ty = self.resolve(ty);
        if !self.is_abstract(ty) {
            return None;
        }
        let raw = u32::try_from(self.listeners.len())
            .unwrap_or_else(|_| panic!("too many abstract type listeners"));
        let id = ListenerId(raw);
        self.listeners.push(Some(ListenerSlot {
            target: ty,
            listener,
        }));
        self.acquire(AbstractUser::Listener(id), ty);
        tracing::trace!(?id, ?ty, "listener subscribed");
        Some(id)
    }

    /// Stop observing and hand the listener back.
    pub fn unsubscribe(&mut self, id: ListenerId) -> Option<Box<dyn AbstractTypeListener>> {
        let slot = self.listeners.get_mut(id.0 as usize)?.take()?;
        self.release(AbstractUser::Listener(id), slot.target);
        Some(slot.listener)
    }

    /// The type a subscription currently tracks.
    pub fn holder_target(&self, id: ListenerId) -> Option<Idx> {
        self.listeners
            .get(id.0 as usize)?
            .as_ref()
            .map(|slot| self.resolve(slot.target))
    }

    /// Move a subscription from `old` to `new` and notify it.
    pub(crate) fn refine_listener(&mut self, id: ListenerId, old: Idx, new: Idx) {
        let user = AbstractUser::Listener(id);
        self.release(user, old);
        let Some(slot) = self.listeners.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return;
        };
        slot.target = new;
        slot.listener.refine_abstract_type(old, new);
        self.acquire(user, new);
    }

    /// The subscription's target became concrete; the caller has already
    /// cleared it from the target's user set.
    pub(crate) fn listener_became_concrete(&mut self, id: ListenerId, ty: Idx) {
        if let Some(slot) = self.listeners.get_mut(id.0 as usize).and_then(Option::as_mut) {
            slot.listener.type_became_concrete(ty);
        }
    }
}

#[cfg(test)]
mod tests;
