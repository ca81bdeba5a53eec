use super::*;

#[test]
fn flags_size() {
    assert_eq!(std::mem::size_of::<TypeFlags>(), 1);
}

#[test]
fn opaque_is_abstract() {
    assert!(TypeFlags::OPAQUE.is_abstract());
    assert!(TypeFlags::OPAQUE.contains(TypeFlags::IS_OPAQUE));
    assert!(!TypeFlags::OPAQUE.is_retired());
}

#[test]
fn only_abstractness_propagates() {
    let propagated = TypeFlags::propagate_all([TypeFlags::OPAQUE, TypeFlags::IS_RETIRED]);
    assert_eq!(propagated, TypeFlags::IS_ABSTRACT);
}

#[test]
fn concrete_children_propagate_nothing() {
    let propagated = TypeFlags::propagate_all([TypeFlags::empty(), TypeFlags::empty()]);
    assert!(propagated.is_empty());
    assert!(TypeFlags::propagate_all(std::iter::empty()).is_empty());
}
