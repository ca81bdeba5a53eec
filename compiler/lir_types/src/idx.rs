//! Type handle into the context arena.
//!
//! `Idx` is the only way code outside this crate refers to a type.
//! Every node lives in the [`TypeContext`](crate::TypeContext) arena and is
//! referenced by its 32-bit position, so identity comparison is O(1) and a
//! handle stays valid for the lifetime of the context, even after the node
//! it names has been refined away (see [`TypeContext::resolve`]).
//!
//! [`TypeContext::resolve`]: crate::TypeContext::resolve

use std::fmt;

/// A 32-bit index into the type arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-3) ===
    // Scalar kinds outside the derived-type core, pre-allocated as leaves.

    /// The `void` type.
    pub const VOID: Self = Self(0);
    /// The `float` type (32-bit IEEE).
    pub const FLOAT: Self = Self(1);
    /// The `double` type (64-bit IEEE).
    pub const DOUBLE: Self = Self(2);
    /// The `label` type (basic block operand).
    pub const LABEL: Self = Self(3);

    // === Built-in Integer Types (indices 4-8) ===
    // Ordinary `IntegerType`s, pre-interned in the integer table.

    /// `i1`.
    pub const INT1: Self = Self(4);
    /// `i8`.
    pub const INT8: Self = Self(5);
    /// `i16`.
    pub const INT16: Self = Self(6);
    /// `i32`.
    pub const INT32: Self = Self(7);
    /// `i64`.
    pub const INT64: Self = Self(8);

    /// Number of pre-allocated types.
    pub const BUILTIN_COUNT: u32 = 9;

    /// Create an index from a raw u32 value.
    ///
    /// The caller must ensure the index was handed out by the same context.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the arena.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-allocated built-in types.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }

    /// Human-readable name for built-in types, `None` for everything else.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("void"),
            1 => Some("float"),
            2 => Some("double"),
            3 => Some("label"),
            4 => Some("i1"),
            5 => Some("i8"),
            6 => Some("i16"),
            7 => Some("i32"),
            8 => Some("i64"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "type#{}", self.0),
        }
    }
}

// Compile-time size assertion: Idx must be exactly 4 bytes
const _: () = assert!(std::mem::size_of::<Idx>() == 4);
