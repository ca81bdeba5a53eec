//! Type factories.
//!
//! Every non-opaque derived type is created through [`TypeContext::get_or_create`]:
//! compute the structural key, probe the registry, and only on a miss
//! allocate a node, wire its slots and register it. Calling a factory twice
//! with equal arguments therefore yields the same [`Idx`].

use super::{Extra, TypeContext, TypeNode};
use crate::attrs::normalize;
use crate::key::TypeKey;
use crate::kinds::{MAX_INT_BITS, MIN_INT_BITS};
use crate::registry::Table;
use crate::{Idx, ParamAttrs, Tag, TypeError, TypeFlags};

impl TypeContext {
    /// Get the integer type of `bits` width.
    pub fn get_integer(&mut self, bits: u32) -> Result<Idx, TypeError> {
        if !(MIN_INT_BITS..=MAX_INT_BITS).contains(&bits) {
            return Err(TypeError::InvalidWidth { bits });
        }
        Ok(self.get_or_create(TypeKey::Integer { bits }))
    }

    /// Get the function type `ret (params...)`.
    ///
    /// `attrs[0]` applies to the return value, `attrs[i]` to parameter
    /// `i - 1`. Missing entries mean no attributes.
    pub fn get_function(
        &mut self,
        ret: Idx,
        params: &[Idx],
        var_args: bool,
        attrs: &[ParamAttrs],
    ) -> Idx {
        let key = TypeKey::Function {
            ret: self.resolve(ret),
            params: params.iter().map(|&p| self.resolve(p)).collect(),
            var_args,
            attrs: normalize(attrs),
        };
        self.get_or_create(key)
    }

    /// Get the structure type with the given fields.
    pub fn get_struct(&mut self, fields: &[Idx], packed: bool) -> Idx {
        let key = TypeKey::Struct {
            fields: fields.iter().map(|&f| self.resolve(f)).collect(),
            packed,
        };
        self.get_or_create(key)
    }

    /// Get the array type `[len x elem]`.
    pub fn get_array(&mut self, elem: Idx, len: u64) -> Idx {
        let elem = self.resolve(elem);
        self.get_or_create(TypeKey::Array { elem, len })
    }

    /// Get the vector type `<len x elem>`.
    ///
    /// # Panics
    /// Panics if `elem` is not an integer or floating-point type.
    pub fn get_vector(&mut self, elem: Idx, len: u32) -> Idx {
        let elem = self.resolve(elem);
        assert!(
            matches!(self.tag(elem), Tag::Integer | Tag::Float | Tag::Double),
            "vector elements must be integer or floating point, found {}",
            self.tag(elem)
        );
        self.get_or_create(TypeKey::Vector { elem, len })
    }

    /// Get the pointer type `elem*`.
    pub fn get_pointer(&mut self, elem: Idx) -> Idx {
        let elem = self.resolve(elem);
        self.get_or_create(TypeKey::Pointer { elem })
    }

    /// Create a fresh opaque placeholder.
    ///
    /// Opaque types are never uniqued: every call returns a new type that is
    /// distinct from every other.
    pub fn create_opaque(&mut self) -> Idx {
        let idx = self.push_node(TypeNode::new(
            Tag::Opaque,
            0,
            Extra::None,
            TypeFlags::OPAQUE,
        ));
        tracing::trace!(?idx, "created opaque type");
        idx
    }

    /// Return the instance registered under `key`, creating it on a miss.
    pub(crate) fn get_or_create(&mut self, key: TypeKey) -> Idx {
        if let Some(existing) = self.registry.lookup(&key) {
            return existing;
        }

        let components = key.components();
        let flags = TypeFlags::propagate_all(components.iter().map(|&c| self.flags(c)));
        let (data, extra) = match &key {
            TypeKey::Integer { bits } => (*bits, Extra::None),
            TypeKey::Struct { packed, .. } => (u32::from(*packed), Extra::None),
            TypeKey::Vector { len, .. } => (*len, Extra::None),
            TypeKey::Array { len, .. } => (0, Extra::ArrayLen(*len)),
            TypeKey::Function {
                var_args, attrs, ..
            } => (
                0,
                Extra::Function {
                    var_args: *var_args,
                    attrs: attrs.clone(),
                },
            ),
            TypeKey::Pointer { .. } => (0, Extra::None),
        };

        let idx = self.push_node(TypeNode::new(key.tag(), data, extra, flags));
        for component in components {
            self.attach_slot(idx, component);
        }

        let table = if flags.is_abstract() {
            Table::Provisional
        } else {
            Table::Canonical
        };
        tracing::trace!(?idx, tag = %key.tag(), ?table, "created type");
        self.registry.insert(idx, key, table);
        idx
    }
}
