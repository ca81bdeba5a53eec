//! Property-based tests for type uniquing and refinement.
//!
//! Types are generated as shape trees whose leaves may be a hole. A hole is
//! built as an opaque placeholder and later refined, and the result must
//! be indistinguishable from building the filled-in shape directly:
//! 1. Idempotence: building the same shape twice yields the same handle
//! 2. Refinement: refining the hole yields the directly-built type
//! 3. Collapse: two copies built over different holes merge once filled

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use lir_types::{Idx, TypeContext};
use proptest::prelude::*;

// -- Shape Generation Strategies --

#[derive(Clone, Copy, Debug)]
enum Scalar {
    Int(u32),
    Float,
    Double,
}

#[derive(Clone, Debug)]
enum Shape {
    Scalar(Scalar),
    Hole,
    Pointer(Box<Shape>),
    Array(Box<Shape>, u64),
    Vector(Scalar, u32),
    Struct(Vec<Shape>, bool),
    Function(Box<Shape>, Vec<Shape>, bool),
}

impl Shape {
    fn has_hole(&self) -> bool {
        match self {
            Shape::Hole => true,
            Shape::Scalar(_) | Shape::Vector(..) => false,
            Shape::Pointer(elem) | Shape::Array(elem, _) => elem.has_hole(),
            Shape::Struct(fields, _) => fields.iter().any(Shape::has_hole),
            Shape::Function(ret, params, _) => {
                ret.has_hole() || params.iter().any(Shape::has_hole)
            }
        }
    }
}

fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        (1u32..=128).prop_map(Scalar::Int),
        Just(Scalar::Float),
        Just(Scalar::Double),
    ]
}

/// Generate a shape; `holes` allows placeholder leaves.
fn shape_strategy(holes: bool) -> impl Strategy<Value = Shape> {
    let scalar = scalar_strategy().prop_map(Shape::Scalar);
    let leaf = if holes {
        prop_oneof![3 => scalar, 1 => Just(Shape::Hole)].boxed()
    } else {
        scalar.boxed()
    };

    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|elem| Shape::Pointer(Box::new(elem))),
            (inner.clone(), 0u64..16).prop_map(|(elem, len)| Shape::Array(Box::new(elem), len)),
            (scalar_strategy(), 1u32..=8).prop_map(|(elem, len)| Shape::Vector(elem, len)),
            (prop::collection::vec(inner.clone(), 0..4), any::<bool>())
                .prop_map(|(fields, packed)| Shape::Struct(fields, packed)),
            (inner.clone(), prop::collection::vec(inner, 0..3), any::<bool>()).prop_map(
                |(ret, params, var_args)| Shape::Function(Box::new(ret), params, var_args)
            ),
        ]
    })
}

// -- Construction --

fn build_scalar(ctx: &mut TypeContext, scalar: Scalar) -> Idx {
    match scalar {
        Scalar::Int(bits) => ctx.get_integer(bits).unwrap(),
        Scalar::Float => Idx::FLOAT,
        Scalar::Double => Idx::DOUBLE,
    }
}

/// Build `shape`, using `hole` for every placeholder leaf.
fn build(ctx: &mut TypeContext, shape: &Shape, hole: Idx) -> Idx {
    match shape {
        Shape::Scalar(scalar) => build_scalar(ctx, *scalar),
        Shape::Hole => hole,
        Shape::Pointer(elem) => {
            let elem = build(ctx, elem, hole);
            ctx.get_pointer(elem)
        }
        Shape::Array(elem, len) => {
            let elem = build(ctx, elem, hole);
            ctx.get_array(elem, *len)
        }
        Shape::Vector(elem, len) => {
            let elem = build_scalar(ctx, *elem);
            ctx.get_vector(elem, *len)
        }
        Shape::Struct(fields, packed) => {
            let fields: Vec<Idx> = fields.iter().map(|f| build(ctx, f, hole)).collect();
            ctx.get_struct(&fields, *packed)
        }
        Shape::Function(ret, params, var_args) => {
            let ret = build(ctx, ret, hole);
            let params: Vec<Idx> = params.iter().map(|p| build(ctx, p, hole)).collect();
            ctx.get_function(ret, &params, *var_args, &[])
        }
    }
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn uniquing_is_idempotent(shape in shape_strategy(false)) {
        let mut ctx = TypeContext::new();
        let first = build(&mut ctx, &shape, Idx::VOID);
        let len = ctx.len();
        let second = build(&mut ctx, &shape, Idx::VOID);

        prop_assert_eq!(first, second);
        prop_assert_eq!(ctx.len(), len);
        prop_assert!(!ctx.is_abstract(first));
    }

    #[test]
    fn refinement_matches_direct_construction(
        shape in shape_strategy(true),
        filler in shape_strategy(false),
    ) {
        let mut ctx = TypeContext::new();
        let hole = ctx.create_opaque();
        let pending = build(&mut ctx, &shape, hole);
        prop_assert_eq!(ctx.is_abstract(pending), shape.has_hole());

        let fill = build(&mut ctx, &filler, Idx::VOID);
        ctx.refine_abstract_type_to(hole, fill);
        let direct = build(&mut ctx, &shape, fill);

        prop_assert_eq!(ctx.resolve(pending), direct);
        prop_assert!(!ctx.is_abstract(pending));
        prop_assert_eq!(ctx.provisional_count(), 0);
    }

    #[test]
    fn filled_copies_collapse(
        shape in shape_strategy(true),
        filler in shape_strategy(false),
    ) {
        let mut ctx = TypeContext::new();
        let first_hole = ctx.create_opaque();
        let second_hole = ctx.create_opaque();
        let first = build(&mut ctx, &shape, first_hole);
        let second = build(&mut ctx, &shape, second_hole);
        prop_assert_eq!(first == second, !shape.has_hole());

        let fill = build(&mut ctx, &filler, Idx::VOID);
        ctx.refine_abstract_type_to(first_hole, fill);
        ctx.refine_abstract_type_to(second_hole, fill);

        prop_assert_eq!(ctx.resolve(first), ctx.resolve(second));
        prop_assert_eq!(ctx.provisional_count(), 0);
    }
}
