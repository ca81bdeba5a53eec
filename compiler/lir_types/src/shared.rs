//! Thread-safe handle to a type context.
//!
//! Construction and refinement mutate the arena, the registry and the
//! observer sets together, so a context admits a single writer at a time.
//! Queries take the read lock and may run concurrently with each other.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::TypeContext;

/// Shared, lock-protected [`TypeContext`].
///
/// Cloning is cheap and yields another handle to the same context.
#[derive(Clone)]
pub struct SharedTypeContext(Arc<RwLock<TypeContext>>);

impl SharedTypeContext {
    /// Create a shared handle to a fresh context.
    pub fn new() -> Self {
        Self::from_context(TypeContext::new())
    }

    /// Share an existing context.
    pub fn from_context(ctx: TypeContext) -> Self {
        SharedTypeContext(Arc::new(RwLock::new(ctx)))
    }

    /// Lock for queries.
    pub fn read(&self) -> RwLockReadGuard<'_, TypeContext> {
        self.0.read()
    }

    /// Lock for construction, refinement or subscription.
    ///
    /// A refinement started under this guard finishes before it is released.
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeContext> {
        self.0.write()
    }
}

impl Default for SharedTypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SharedTypeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTypeContext")
            .field("len", &self.0.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
