//! Derived types for the LIR intermediate representation.
//!
//! Integer, function, struct, array, vector, pointer and opaque types, all
//! uniqued per [`TypeContext`]: building the same structure twice yields
//! the same [`Idx`], so type equality is handle equality.
//!
//! # Abstract types
//!
//! An [`OpaqueType`] is a placeholder for a type that is not known yet (a
//! forward declaration). Any type that transitively contains one is
//! *abstract*. Once the real type is known, the placeholder is replaced
//! everywhere with [`TypeContext::refine_abstract_type_to`]: every composite
//! that used it is rewritten, duplicates that appear are merged, and types
//! that no longer reach a placeholder become concrete. Refining an opaque
//! type to a struct that points back at it is how recursive types are built.
//!
//! # Example
//!
//! ```
//! use lir_types::{Idx, TypeContext};
//!
//! let mut ctx = TypeContext::new();
//! let node = ctx.create_opaque();
//! let link = ctx.get_pointer(node);
//! let list = ctx.get_struct(&[Idx::INT32, link], false);
//! assert!(ctx.is_abstract(list));
//!
//! ctx.refine_abstract_type_to(node, list);
//! assert!(!ctx.is_abstract(list));
//! assert_eq!(ctx.display(list).to_string(), "{ i32, \\2* }");
//! ```

mod attrs;
mod context;
mod error;
mod flags;
mod format;
mod idx;
pub mod key;
pub mod kinds;
mod listener;
mod mask;
mod refine;
mod registry;
mod shared;
mod tag;
mod value;

pub use attrs::ParamAttrs;
pub use context::{AbstractUser, TypeContext};
pub use error::TypeError;
pub use flags::TypeFlags;
pub use format::TypeDisplay;
pub use idx::Idx;
pub use key::TypeKey;
pub use kinds::{
    ArrayType, CompositeType, DerivedType, FunctionType, Indexable, IntegerType, OpaqueType,
    PointerType, SequentialType, StructType, TypeKind, TypeView, VectorType, MAX_INT_BITS,
    MIN_INT_BITS,
};
pub use listener::{AbstractTypeListener, ListenerId};
pub use mask::WideMask;
pub use shared::SharedTypeContext;
pub use tag::Tag;
pub use value::IndexValue;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set, and only the first call has any
/// effect. Refinement logs at `debug`; per-slot rewiring at `trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

