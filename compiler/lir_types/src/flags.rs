//! Per-node state flags.
//!
//! Abstractness is a property of the contained-type graph (a node is
//! abstract iff it can reach a live opaque type). The flag caches that
//! answer; it is computed at construction and recomputed by refinement,
//! never set independently.

use bitflags::bitflags;

bitflags! {
    /// Cached node state.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u8 {
        /// Transitively contains an opaque type (or is one).
        const IS_ABSTRACT = 1 << 0;
        /// Is itself an opaque placeholder.
        const IS_OPAQUE = 1 << 1;
        /// Refined away; the node is a tombstone with a forward link.
        const IS_RETIRED = 1 << 2;
    }
}

impl TypeFlags {
    /// Flags for a fresh opaque placeholder.
    pub const OPAQUE: Self = Self::IS_ABSTRACT.union(Self::IS_OPAQUE);

    /// Flags that propagate from a contained type to its owner.
    pub const PROPAGATE_MASK: Self = Self::IS_ABSTRACT;

    #[inline]
    pub const fn is_abstract(self) -> bool {
        self.contains(Self::IS_ABSTRACT)
    }

    #[inline]
    pub const fn is_retired(self) -> bool {
        self.contains(Self::IS_RETIRED)
    }

    /// Combine the propagating flags of every contained type.
    #[inline]
    pub fn propagate_all(children: impl IntoIterator<Item = Self>) -> Self {
        children
            .into_iter()
            .fold(Self::empty(), |acc, child| {
                acc.union(child.intersection(Self::PROPAGATE_MASK))
            })
    }
}

#[cfg(test)]
mod tests;
