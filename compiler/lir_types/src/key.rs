//! Structural keys for the uniquing registry.
//!
//! A key captures everything that distinguishes one uniqued type from
//! another of the same kind. Components are compared by handle, so two
//! keys are equal iff the types they describe are built from identical
//! component instances. Isomorphic cyclic types with distinct components
//! are detected separately via the shape hash (see `refine`).

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::{Idx, ParamAttrs, Tag};

/// Per-kind structural descriptor.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeKey {
    /// Integer of the given width.
    Integer { bits: u32 },
    /// Function signature. `attrs` is normalized (trailing empty sets trimmed).
    Function {
        ret: Idx,
        params: Box<[Idx]>,
        var_args: bool,
        attrs: Box<[ParamAttrs]>,
    },
    /// Ordered fields plus packing.
    Struct { fields: Box<[Idx]>, packed: bool },
    /// Element type and 64-bit length.
    Array { elem: Idx, len: u64 },
    /// Element type and 32-bit length.
    Vector { elem: Idx, len: u32 },
    /// Pointee type.
    Pointer { elem: Idx },
}

impl TypeKey {
    /// The kind this key belongs to.
    pub fn tag(&self) -> Tag {
        match self {
            Self::Integer { .. } => Tag::Integer,
            Self::Function { .. } => Tag::Function,
            Self::Struct { .. } => Tag::Struct,
            Self::Array { .. } => Tag::Array,
            Self::Vector { .. } => Tag::Vector,
            Self::Pointer { .. } => Tag::Pointer,
        }
    }

    /// Component types in slot order.
    pub fn components(&self) -> Vec<Idx> {
        match self {
            Self::Integer { .. } => Vec::new(),
            Self::Function { ret, params, .. } => {
                std::iter::once(*ret).chain(params.iter().copied()).collect()
            }
            Self::Struct { fields, .. } => fields.to_vec(),
            Self::Array { elem, .. } | Self::Vector { elem, .. } | Self::Pointer { elem } => {
                vec![*elem]
            }
        }
    }

    /// Hash of everything except component identities.
    ///
    /// Isomorphic types always share a shape hash, whatever instances their
    /// slots point at.
    pub fn shape_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.tag().hash(&mut hasher);
        match self {
            Self::Integer { bits } => bits.hash(&mut hasher),
            Self::Function {
                params,
                var_args,
                attrs,
                ..
            } => {
                params.len().hash(&mut hasher);
                var_args.hash(&mut hasher);
                attrs.hash(&mut hasher);
            }
            Self::Struct { fields, packed } => {
                fields.len().hash(&mut hasher);
                packed.hash(&mut hasher);
            }
            Self::Array { len, .. } => len.hash(&mut hasher),
            Self::Vector { len, .. } => len.hash(&mut hasher),
            Self::Pointer { .. } => {}
        }
        hasher.finish()
    }

    /// Check if the non-component parts of two keys agree.
    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer { bits: a }, Self::Integer { bits: b }) => a == b,
            (
                Self::Function {
                    params: pa,
                    var_args: va,
                    attrs: aa,
                    ..
                },
                Self::Function {
                    params: pb,
                    var_args: vb,
                    attrs: ab,
                    ..
                },
            ) => pa.len() == pb.len() && va == vb && aa == ab,
            (
                Self::Struct {
                    fields: fa,
                    packed: pa,
                },
                Self::Struct {
                    fields: fb,
                    packed: pb,
                },
            ) => fa.len() == fb.len() && pa == pb,
            (Self::Array { len: a, .. }, Self::Array { len: b, .. }) => a == b,
            (Self::Vector { len: a, .. }, Self::Vector { len: b, .. }) => a == b,
            (Self::Pointer { .. }, Self::Pointer { .. }) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests;
