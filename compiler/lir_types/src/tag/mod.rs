//! Type kind tag for tag-driven dispatch.
//!
//! Every node in the arena carries a `Tag`. Kind discrimination
//! (`isa`/`dyn_cast` style) is a match on the tag, so the set of kinds is
//! closed and every dispatch site is checked for exhaustiveness.
//!
//! # Tag Categories
//!
//! - 0-15: Primitive scalars outside the derived-type core
//! - 16-31: Leaf derived types (integer)
//! - 32-47: Function types
//! - 48-63: Composite types (struct, then the sequential family)
//! - 64-79: Placeholders (opaque)

use std::fmt;

/// Type kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Tag {
    // === Primitives (0-15) ===
    /// No value.
    Void = 0,
    /// 32-bit floating point.
    Float = 1,
    /// 64-bit floating point.
    Double = 2,
    /// Basic block label.
    Label = 3,

    // === Leaf Derived (16-31) ===
    /// Arbitrary-width integer; the subclass data word holds the width.
    Integer = 16,

    // === Functions (32-47) ===
    /// Function signature: return slot followed by parameter slots.
    Function = 32,

    // === Composites (48-63) ===
    /// Structure; the subclass data word holds the packed flag.
    Struct = 48,
    /// Fixed-length array with a 64-bit element count.
    Array = 49,
    /// SIMD vector with a 32-bit element count.
    Vector = 50,
    /// Pointer to an element type.
    Pointer = 51,

    // === Placeholders (64-79) ===
    /// Forward-declared type awaiting refinement.
    Opaque = 64,
}

impl Tag {
    /// Check if this tag is a primitive scalar (not a derived type).
    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) < 16
    }

    /// Check if this tag is a derived type (everything but the primitives).
    #[inline]
    pub const fn is_derived(self) -> bool {
        !self.is_primitive()
    }

    /// Check if this tag belongs to the composite family.
    #[inline]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Struct | Self::Array | Self::Vector | Self::Pointer)
    }

    /// Check if this tag belongs to the sequential family.
    #[inline]
    pub const fn is_sequential(self) -> bool {
        matches!(self, Self::Array | Self::Vector | Self::Pointer)
    }

    /// Check if values of this kind can be produced by instructions.
    #[inline]
    pub const fn is_first_class(self) -> bool {
        !matches!(
            self,
            Self::Void | Self::Function | Self::Struct | Self::Array | Self::Opaque
        )
    }

    /// Check if nodes of this kind go through the uniquing registry.
    ///
    /// Opaque types are distinct by identity; primitives are pre-allocated.
    #[inline]
    pub const fn is_uniqued(self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::Function
                | Self::Struct
                | Self::Array
                | Self::Vector
                | Self::Pointer
        )
    }

    /// Get the name of this tag as a static string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Float => "float",
            Self::Double => "double",
            Self::Label => "label",
            Self::Integer => "integer",
            Self::Function => "function",
            Self::Struct => "struct",
            Self::Array => "array",
            Self::Vector => "vector",
            Self::Pointer => "pointer",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag::{}", self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Compile-time size assertion: Tag must be exactly 1 byte
const _: () = assert!(std::mem::size_of::<Tag>() == 1);
