use std::thread;

use super::*;
use crate::Idx;

#[test]
fn clones_share_one_context() {
    let shared = SharedTypeContext::new();
    let other = shared.clone();

    let ptr = shared.write().get_pointer(Idx::INT32);
    assert_eq!(other.write().get_pointer(Idx::INT32), ptr);
}

#[test]
fn concurrent_writers_agree_on_canonical_instances() {
    let shared = SharedTypeContext::new();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut ctx = shared.write();
                let ptr = ctx.get_pointer(Idx::INT8);
                ctx.get_struct(&[Idx::INT32, ptr], false)
            })
        })
        .collect();

    let results: Vec<Idx> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn refinement_is_visible_to_readers() {
    let shared = SharedTypeContext::new();
    let (opaque, ptr) = {
        let mut ctx = shared.write();
        let opaque = ctx.create_opaque();
        let ptr = ctx.get_pointer(opaque);
        (opaque, ptr)
    };

    shared.write().refine_abstract_type_to(opaque, Idx::INT64);

    let ctx = shared.read();
    assert!(!ctx.is_abstract(ptr));
    assert_eq!(ctx.contained(ptr), &[Idx::INT64]);
}

#[test]
fn debug_reports_arena_size() {
    let shared = SharedTypeContext::new();
    let rendered = format!("{shared:?}");
    assert!(rendered.starts_with("SharedTypeContext"));
    assert!(rendered.contains("len: 9"));
}
