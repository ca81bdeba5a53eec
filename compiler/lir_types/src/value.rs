//! Index operands for composite indexing.
//!
//! The instruction and constant layer lives elsewhere; this is the slice of
//! it that `type_at_index`/`index_valid` need: the operand's type and, for
//! constants, its zero-extended value.

use crate::Idx;

/// An operand used to index into a composite type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum IndexValue {
    /// Integer constant, zero-extended to 64 bits.
    Constant { ty: Idx, value: u64 },
    /// Any value only known at run time.
    Dynamic { ty: Idx },
}

impl IndexValue {
    pub const fn constant(ty: Idx, value: u64) -> Self {
        Self::Constant { ty, value }
    }

    pub const fn dynamic(ty: Idx) -> Self {
        Self::Dynamic { ty }
    }

    /// Type of the operand.
    pub const fn ty(&self) -> Idx {
        match *self {
            Self::Constant { ty, .. } | Self::Dynamic { ty } => ty,
        }
    }

    /// Zero-extended value if this is a constant.
    pub const fn as_constant(&self) -> Option<u64> {
        match *self {
            Self::Constant { value, .. } => Some(value),
            Self::Dynamic { .. } => None,
        }
    }
}
