//! Typed views for kind discrimination.
//!
//! A view is a `(context, Idx)` pair whose kind has been checked. Use
//! [`TypeContext::dyn_cast`] to get one when the kind is uncertain,
//! [`TypeContext::cast`] when it is a precondition, or
//! [`TypeContext::kind`] to match exhaustively over every kind.

mod composite;

pub use composite::{CompositeType, Indexable, SequentialType};

use std::fmt;

use crate::context::Extra;
use crate::mask::WideMask;
use crate::{Idx, ParamAttrs, Tag, TypeContext};

/// Smallest integer width.
pub const MIN_INT_BITS: u32 = 1;

/// Largest integer width. The width lives in a 23-bit field.
pub const MAX_INT_BITS: u32 = (1 << 23) - 1;

/// A checked view of one kind (or family of kinds).
pub trait TypeView<'ctx>: Copy {
    /// Check if a type with this tag can be viewed as `Self`.
    fn classof(tag: Tag) -> bool;

    /// Wrap without checking. Callers go through [`TypeContext::dyn_cast`].
    #[doc(hidden)]
    fn wrap(ctx: &'ctx TypeContext, idx: Idx) -> Self;

    /// The viewed type.
    fn idx(&self) -> Idx;
}

macro_rules! define_view {
    ($(#[$meta:meta])* $name:ident, $classof:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone)]
        pub struct $name<'ctx> {
            ctx: &'ctx TypeContext,
            idx: Idx,
        }

        impl<'ctx> TypeView<'ctx> for $name<'ctx> {
            #[inline]
            fn classof(tag: Tag) -> bool {
                let check: fn(Tag) -> bool = $classof;
                check(tag)
            }

            #[inline]
            fn wrap(ctx: &'ctx TypeContext, idx: Idx) -> Self {
                Self { ctx, idx }
            }

            #[inline]
            fn idx(&self) -> Idx {
                self.idx
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.ctx, other.ctx) && self.idx == other.idx
            }
        }

        impl Eq for $name<'_> {}

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.idx)
            }
        }
    };
}
pub(crate) use define_view;

define_view!(
    /// Any derived type.
    DerivedType,
    Tag::is_derived
);
define_view!(
    /// Arbitrary-width integer.
    IntegerType,
    |tag| tag == Tag::Integer
);
define_view!(
    /// Function signature.
    FunctionType,
    |tag| tag == Tag::Function
);
define_view!(
    /// Structure with ordered fields.
    StructType,
    |tag| tag == Tag::Struct
);
define_view!(
    /// Fixed-length array.
    ArrayType,
    |tag| tag == Tag::Array
);
define_view!(
    /// SIMD vector.
    VectorType,
    |tag| tag == Tag::Vector
);
define_view!(
    /// Pointer.
    PointerType,
    |tag| tag == Tag::Pointer
);
define_view!(
    /// Forward-declared placeholder.
    OpaqueType,
    |tag| tag == Tag::Opaque
);

/// Every kind, for exhaustive matching.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeKind<'ctx> {
    /// Scalar outside the derived-type core (`void`, `float`, `double`, `label`).
    Primitive(Tag),
    Integer(IntegerType<'ctx>),
    Function(FunctionType<'ctx>),
    Struct(StructType<'ctx>),
    Array(ArrayType<'ctx>),
    Vector(VectorType<'ctx>),
    Pointer(PointerType<'ctx>),
    Opaque(OpaqueType<'ctx>),
}

impl TypeContext {
    /// View `idx` as `V` if its kind matches.
    pub fn dyn_cast<'ctx, V: TypeView<'ctx>>(&'ctx self, idx: Idx) -> Option<V> {
        let idx = self.resolve(idx);
        V::classof(self.tag(idx)).then(|| V::wrap(self, idx))
    }

    /// Check if `idx` can be viewed as `V`.
    pub fn isa<'ctx, V: TypeView<'ctx>>(&'ctx self, idx: Idx) -> bool {
        V::classof(self.tag(idx))
    }

    /// View `idx` as `V`.
    ///
    /// # Panics
    /// Panics if the kind does not match.
    pub fn cast<'ctx, V: TypeView<'ctx>>(&'ctx self, idx: Idx) -> V {
        self.dyn_cast(idx)
            .unwrap_or_else(|| panic!("cast of {idx:?} ({}) to the wrong kind", self.tag(idx)))
    }

    /// Classify `idx` into its kind.
    pub fn kind(&self, idx: Idx) -> TypeKind<'_> {
        let idx = self.resolve(idx);
        match self.tag(idx) {
            tag @ (Tag::Void | Tag::Float | Tag::Double | Tag::Label) => TypeKind::Primitive(tag),
            Tag::Integer => TypeKind::Integer(IntegerType::wrap(self, idx)),
            Tag::Function => TypeKind::Function(FunctionType::wrap(self, idx)),
            Tag::Struct => TypeKind::Struct(StructType::wrap(self, idx)),
            Tag::Array => TypeKind::Array(ArrayType::wrap(self, idx)),
            Tag::Vector => TypeKind::Vector(VectorType::wrap(self, idx)),
            Tag::Pointer => TypeKind::Pointer(PointerType::wrap(self, idx)),
            Tag::Opaque => TypeKind::Opaque(OpaqueType::wrap(self, idx)),
        }
    }
}

impl DerivedType<'_> {
    pub fn tag(&self) -> Tag {
        self.ctx.tag(self.idx)
    }

    pub fn is_abstract(&self) -> bool {
        self.ctx.is_abstract(self.idx)
    }
}

impl IntegerType<'_> {
    pub const MIN_INT_BITS: u32 = MIN_INT_BITS;
    pub const MAX_INT_BITS: u32 = MAX_INT_BITS;

    pub fn bit_width(&self) -> u32 {
        self.ctx.subclass_data(self.idx)
    }

    /// Mask with the low `bit_width` bits set, e.g. `0xFF` for `i8`.
    ///
    /// Widths above 64 saturate to all ones; use [`mask`](Self::mask).
    pub fn bit_mask(&self) -> u64 {
        let bits = self.ctx.primitive_size_in_bits(self.idx);
        debug_assert!(bits <= 64, "bit_mask on i{bits}; use mask()");
        u64::MAX >> 64u64.saturating_sub(bits)
    }

    /// Mask with the low `bit_width` bits set, at any width.
    pub fn mask(&self) -> WideMask {
        WideMask::all_ones(self.bit_width())
    }

    /// Check if the width rounded up to whole bytes is a power of two.
    pub fn is_power_of_2_byte_width(&self) -> bool {
        self.bit_width().div_ceil(8).is_power_of_two()
    }
}

impl<'ctx> FunctionType<'ctx> {
    pub fn return_type(&self) -> Idx {
        self.ctx.contained(self.idx)[0]
    }

    pub fn params(&self) -> &'ctx [Idx] {
        &self.ctx.contained(self.idx)[1..]
    }

    /// Number of fixed parameters; varargs are not counted.
    pub fn num_params(&self) -> usize {
        self.params().len()
    }

    /// # Panics
    /// Panics if `i >= num_params()`.
    pub fn param_type(&self, i: usize) -> Idx {
        self.params()[i]
    }

    pub fn is_var_arg(&self) -> bool {
        matches!(
            self.ctx.extra(self.idx),
            Extra::Function { var_args: true, .. }
        )
    }

    fn attrs(&self) -> &'ctx [ParamAttrs] {
        match self.ctx.extra(self.idx) {
            Extra::Function { attrs, .. } => attrs,
            Extra::None | Extra::ArrayLen(_) => &[],
        }
    }

    /// Attributes of parameter `i`; index 0 is the return value.
    pub fn param_attrs(&self, i: usize) -> ParamAttrs {
        self.attrs().get(i).copied().unwrap_or_default()
    }

    pub fn param_has_attr(&self, i: usize, attr: ParamAttrs) -> bool {
        self.param_attrs(i).intersects(attr)
    }

    /// Number of stored attribute entries (trailing empty entries are trimmed).
    pub fn num_attrs(&self) -> usize {
        self.attrs().len()
    }

    /// Check if the first parameter is a hidden struct-return pointer.
    pub fn is_struct_return(&self) -> bool {
        self.num_params() > 0 && self.param_has_attr(1, ParamAttrs::STRUCT_RET)
    }

    /// Assembly text for an attribute set.
    pub fn param_attrs_text(attrs: ParamAttrs) -> String {
        attrs.text()
    }
}

impl<'ctx> StructType<'ctx> {
    pub fn num_elements(&self) -> usize {
        self.elements().len()
    }

    pub fn elements(&self) -> &'ctx [Idx] {
        self.ctx.contained(self.idx)
    }

    /// # Panics
    /// Panics if `n >= num_elements()`.
    pub fn element_type(&self, n: usize) -> Idx {
        let elements = self.elements();
        assert!(
            n < elements.len(),
            "element {n} out of range for struct with {} fields",
            elements.len()
        );
        elements[n]
    }

    pub fn is_packed(&self) -> bool {
        self.ctx.subclass_data(self.idx) != 0
    }
}

impl ArrayType<'_> {
    pub fn element_type(&self) -> Idx {
        self.ctx.contained(self.idx)[0]
    }

    pub fn num_elements(&self) -> u64 {
        match self.ctx.extra(self.idx) {
            Extra::ArrayLen(len) => *len,
            Extra::None | Extra::Function { .. } => 0,
        }
    }
}

impl VectorType<'_> {
    pub fn element_type(&self) -> Idx {
        self.ctx.contained(self.idx)[0]
    }

    pub fn num_elements(&self) -> u32 {
        self.ctx.subclass_data(self.idx)
    }

    /// Total width: element count times element width.
    pub fn bit_width(&self) -> u64 {
        u64::from(self.num_elements()) * self.ctx.primitive_size_in_bits(self.element_type())
    }
}

impl PointerType<'_> {
    pub fn element_type(&self) -> Idx {
        self.ctx.contained(self.idx)[0]
    }
}
