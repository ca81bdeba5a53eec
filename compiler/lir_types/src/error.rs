//! Recoverable type-construction and indexing errors.
//!
//! Protocol misuse (refining a concrete type, notifying an opaque type, and
//! so on) is not represented here: it indicates a defect in the caller and
//! panics instead.

use crate::kinds::{MAX_INT_BITS, MIN_INT_BITS};

/// Error from a type factory or an index query.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum TypeError {
    /// Integer width outside `[MIN_INT_BITS, MAX_INT_BITS]`.
    #[error(
        "invalid integer width {bits}: must be between {} and {}",
        MIN_INT_BITS,
        MAX_INT_BITS
    )]
    InvalidWidth { bits: u32 },

    /// Struct field index past the last field.
    #[error("struct index {index} out of range for {len} fields")]
    IndexOutOfRange { index: u64, len: usize },

    /// Struct index is not a constant `i32`.
    #[error("struct index must be a constant i32")]
    NotAConstant,
}
