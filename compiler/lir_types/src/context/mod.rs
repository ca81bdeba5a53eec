//! The type context: arena, uniquing registry and observer graph.
//!
//! Every type lives in one `TypeContext` and is addressed by [`Idx`].
//! Composite nodes own an ordered list of contained-type slots; a slot that
//! points at an abstract type registers its owner in that type's
//! abstract-user set so refinement can find and rewrite it.
//!
//! # Lifecycle
//!
//! Nodes are never freed. A node that is refined away becomes a tombstone:
//! its slots are cleared, its user set is empty, and it carries a forward
//! link to the type that replaced it. [`TypeContext::resolve`] follows those
//! links and every read accessor resolves first, so outstanding handles
//! keep observing the replacement.
//!
//! # Concurrency
//!
//! A context has no internal locking. Share it through
//! [`SharedTypeContext`](crate::SharedTypeContext), which serializes all
//! mutation behind one write lock.

mod construct;
mod handle;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::key::TypeKey;
use crate::listener::{ListenerId, ListenerSlot};
use crate::registry::{Registry, Table};
use crate::{Idx, ParamAttrs, Tag, TypeFlags};

/// An entity that must hear about refinement of an abstract type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum AbstractUser {
    /// A composite holding at least one slot that points at the type.
    Type(Idx),
    /// An external subscriber.
    Listener(ListenerId),
}

/// Kind-specific payload that does not fit the subclass data word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Extra {
    None,
    ArrayLen(u64),
    Function {
        var_args: bool,
        attrs: Box<[ParamAttrs]>,
    },
}

/// One arena entry.
pub(crate) struct TypeNode {
    pub(crate) tag: Tag,
    /// Integer width, struct packed flag, or vector length.
    pub(crate) data: u32,
    pub(crate) extra: Extra,
    pub(crate) contained: SmallVec<[Idx; 4]>,
    pub(crate) flags: TypeFlags,
    /// Multiset of users: one count per slot (or subscription) pointing here.
    pub(crate) users: FxHashMap<AbstractUser, u32>,
    /// Replacement, once refined away.
    pub(crate) forward: Option<Idx>,
}

impl TypeNode {
    fn new(tag: Tag, data: u32, extra: Extra, flags: TypeFlags) -> Self {
        Self {
            tag,
            data,
            extra,
            contained: SmallVec::new(),
            flags,
            users: FxHashMap::default(),
            forward: None,
        }
    }
}

/// Owner of all types of one compilation universe.
pub struct TypeContext {
    nodes: Vec<TypeNode>,
    pub(crate) registry: Registry,
    pub(crate) listeners: Vec<Option<ListenerSlot>>,
}

impl TypeContext {
    /// Create a context with the built-in types pre-allocated.
    pub fn new() -> Self {
        let mut ctx = Self {
            nodes: Vec::with_capacity(256),
            registry: Registry::new(),
            listeners: Vec::new(),
        };

        for tag in [Tag::Void, Tag::Float, Tag::Double, Tag::Label] {
            ctx.push_node(TypeNode::new(tag, 0, Extra::None, TypeFlags::empty()));
        }
        for (expected, bits) in [
            (Idx::INT1, 1),
            (Idx::INT8, 8),
            (Idx::INT16, 16),
            (Idx::INT32, 32),
            (Idx::INT64, 64),
        ] {
            let idx = ctx.get_or_create(TypeKey::Integer { bits });
            debug_assert_eq!(idx, expected);
        }

        ctx
    }

    pub(crate) fn push_node(&mut self, node: TypeNode) -> Idx {
        let raw = u32::try_from(self.nodes.len())
            .unwrap_or_else(|_| panic!("type context exceeded u32::MAX types"));
        self.nodes.push(node);
        Idx::from_raw(raw)
    }

    /// The node at `idx` without following forward links.
    #[inline]
    pub(crate) fn raw(&self, idx: Idx) -> &TypeNode {
        &self.nodes[idx.index()]
    }

    #[inline]
    pub(crate) fn raw_mut(&mut self, idx: Idx) -> &mut TypeNode {
        &mut self.nodes[idx.index()]
    }

    /// The live node `idx` stands for.
    #[inline]
    pub(crate) fn node(&self, idx: Idx) -> &TypeNode {
        self.raw(self.resolve(idx))
    }

    // ========================================
    // Queries
    // ========================================

    /// Follow forward links left by refinement to the live type.
    pub fn resolve(&self, mut idx: Idx) -> Idx {
        while let Some(next) = self.raw(idx).forward {
            idx = next;
        }
        idx
    }

    /// Kind of the type.
    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.node(idx).tag
    }

    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.node(idx).flags
    }

    /// Check if the type transitively contains an opaque type.
    #[inline]
    pub fn is_abstract(&self, idx: Idx) -> bool {
        self.flags(idx).is_abstract()
    }

    /// Check if this handle names a type that was refined away.
    #[inline]
    pub fn is_retired(&self, idx: Idx) -> bool {
        self.raw(idx).flags.is_retired()
    }

    /// Contained types in slot order.
    #[inline]
    pub fn contained(&self, idx: Idx) -> &[Idx] {
        &self.node(idx).contained
    }

    /// Raw subclass data word (integer width, packed flag, vector length).
    #[inline]
    pub(crate) fn subclass_data(&self, idx: Idx) -> u32 {
        self.node(idx).data
    }

    #[inline]
    pub(crate) fn extra(&self, idx: Idx) -> &Extra {
        &self.node(idx).extra
    }

    /// Size in bits of first-class scalar and vector types, 0 otherwise.
    pub fn primitive_size_in_bits(&self, idx: Idx) -> u64 {
        let node = self.node(idx);
        match node.tag {
            Tag::Integer => u64::from(node.data),
            Tag::Float => 32,
            Tag::Double => 64,
            Tag::Vector => {
                u64::from(node.data) * self.primitive_size_in_bits(node.contained[0])
            }
            Tag::Void
            | Tag::Label
            | Tag::Function
            | Tag::Struct
            | Tag::Array
            | Tag::Pointer
            | Tag::Opaque => 0,
        }
    }

    /// Distinct users currently observing `idx`, in a stable order.
    pub fn abstract_users(&self, idx: Idx) -> Vec<AbstractUser> {
        let mut users: Vec<AbstractUser> = self.raw(idx).users.keys().copied().collect();
        users.sort_unstable();
        users
    }

    /// Number of slots and subscriptions pointing at `idx`.
    pub fn abstract_use_count(&self, idx: Idx) -> u32 {
        self.raw(idx).users.values().sum()
    }

    /// Structural key the type is registered under, if it is uniqued.
    pub fn registered_key(&self, idx: Idx) -> Option<&TypeKey> {
        self.registry.key_of(self.resolve(idx))
    }

    /// Check if the type sits in the canonical (concrete) registry table.
    pub fn is_canonical(&self, idx: Idx) -> bool {
        self.registry.table_of(self.resolve(idx)) == Some(Table::Canonical)
    }

    /// Number of canonical registry entries.
    pub fn canonical_count(&self) -> usize {
        self.registry.canonical_len()
    }

    /// Number of abstract composites awaiting refinement in the registry.
    pub fn provisional_count(&self) -> usize {
        self.registry.provisional_len()
    }

    /// Total arena size, tombstones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A context always holds the built-in types.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of types that have not been refined away.
    pub fn live_types(&self) -> usize {
        self.nodes.iter().filter(|n| !n.flags.is_retired()).count()
    }

    /// Structural key computed from the node's current slots.
    pub(crate) fn key_of_node(&self, idx: Idx) -> TypeKey {
        let node = self.raw(idx);
        match node.tag {
            Tag::Integer => TypeKey::Integer { bits: node.data },
            Tag::Function => {
                let (var_args, attrs) = match &node.extra {
                    Extra::Function { var_args, attrs } => (*var_args, attrs.clone()),
                    Extra::None | Extra::ArrayLen(_) => (false, Box::default()),
                };
                TypeKey::Function {
                    ret: node.contained[0],
                    params: node.contained[1..].into(),
                    var_args,
                    attrs,
                }
            }
            Tag::Struct => TypeKey::Struct {
                fields: node.contained.as_slice().into(),
                packed: node.data != 0,
            },
            Tag::Array => TypeKey::Array {
                elem: node.contained[0],
                len: match node.extra {
                    Extra::ArrayLen(len) => len,
                    Extra::None | Extra::Function { .. } => 0,
                },
            },
            Tag::Vector => TypeKey::Vector {
                elem: node.contained[0],
                len: node.data,
            },
            Tag::Pointer => TypeKey::Pointer {
                elem: node.contained[0],
            },
            Tag::Void | Tag::Float | Tag::Double | Tag::Label | Tag::Opaque => {
                panic!("{:?} of kind {} has no structural key", idx, node.tag)
            }
        }
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeContext")
            .field("len", &self.len())
            .field("live", &self.live_types())
            .field("canonical", &self.canonical_count())
            .field("provisional", &self.provisional_count())
            .finish()
    }
}
