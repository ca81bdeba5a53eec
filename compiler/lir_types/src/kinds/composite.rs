//! The composite family: types that can be indexed into.

use std::fmt;

use super::{define_view, ArrayType, PointerType, StructType, TypeView, VectorType};
use crate::{Idx, IndexValue, Tag, TypeContext, TypeError};

define_view!(
    /// Struct or any sequential type.
    CompositeType,
    Tag::is_composite
);
define_view!(
    /// Array, vector, or pointer: one element type repeated in memory.
    SequentialType,
    Tag::is_sequential
);

/// Element lookup by index operand.
pub trait Indexable {
    /// Check if `index` can select an element of this type.
    fn index_valid(&self, index: &IndexValue) -> bool;

    /// Type of the element `index` selects.
    fn try_type_at_index(&self, index: &IndexValue) -> Result<Idx, TypeError>;

    /// Type of the element `index` selects.
    ///
    /// # Panics
    /// Panics if `index` is not valid; check [`index_valid`](Self::index_valid) first.
    fn type_at_index(&self, index: &IndexValue) -> Idx {
        self.try_type_at_index(index)
            .unwrap_or_else(|err| panic!("type_at_index: {err}"))
    }
}

impl Indexable for StructType<'_> {
    fn index_valid(&self, index: &IndexValue) -> bool {
        self.try_type_at_index(index).is_ok()
    }

    /// Struct indices must be constant `i32`s below the field count.
    fn try_type_at_index(&self, index: &IndexValue) -> Result<Idx, TypeError> {
        let value = match index.as_constant() {
            Some(value) if self.ctx.resolve(index.ty()) == Idx::INT32 => value,
            _ => return Err(TypeError::NotAConstant),
        };
        let elements = self.elements();
        usize::try_from(value)
            .ok()
            .and_then(|i| elements.get(i).copied())
            .ok_or(TypeError::IndexOutOfRange {
                index: value,
                len: elements.len(),
            })
    }
}

impl SequentialType<'_> {
    pub fn element_type(&self) -> Idx {
        self.ctx.contained(self.idx)[0]
    }
}

impl Indexable for SequentialType<'_> {
    /// Any integer-typed operand; bounds are a run-time concern.
    fn index_valid(&self, index: &IndexValue) -> bool {
        self.ctx.tag(index.ty()) == Tag::Integer
    }

    fn try_type_at_index(&self, _index: &IndexValue) -> Result<Idx, TypeError> {
        Ok(self.element_type())
    }
}

impl CompositeType<'_> {
    fn dispatch<R>(
        &self,
        on_struct: impl FnOnce(StructType<'_>) -> R,
        on_sequential: impl FnOnce(SequentialType<'_>) -> R,
    ) -> R {
        if self.ctx.tag(self.idx) == Tag::Struct {
            on_struct(StructType::wrap(self.ctx, self.idx))
        } else {
            on_sequential(SequentialType::wrap(self.ctx, self.idx))
        }
    }
}

impl Indexable for CompositeType<'_> {
    fn index_valid(&self, index: &IndexValue) -> bool {
        self.dispatch(|s| s.index_valid(index), |s| s.index_valid(index))
    }

    fn try_type_at_index(&self, index: &IndexValue) -> Result<Idx, TypeError> {
        self.dispatch(
            |s| s.try_type_at_index(index),
            |s| s.try_type_at_index(index),
        )
    }
}

macro_rules! sequential_indexable {
    ($($name:ident),*) => {$(
        impl Indexable for $name<'_> {
            fn index_valid(&self, index: &IndexValue) -> bool {
                SequentialType::wrap(self.ctx, self.idx).index_valid(index)
            }

            fn try_type_at_index(&self, index: &IndexValue) -> Result<Idx, TypeError> {
                SequentialType::wrap(self.ctx, self.idx).try_type_at_index(index)
            }
        }
    )*};
}

sequential_indexable!(ArrayType, VectorType, PointerType);
