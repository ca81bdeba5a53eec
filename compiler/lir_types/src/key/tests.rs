use super::*;

fn struct_key(fields: &[Idx], packed: bool) -> TypeKey {
    TypeKey::Struct {
        fields: fields.into(),
        packed,
    }
}

#[test]
fn equal_keys_for_equal_structure() {
    assert_eq!(
        struct_key(&[Idx::INT32, Idx::INT8], false),
        struct_key(&[Idx::INT32, Idx::INT8], false)
    );
    assert_ne!(
        struct_key(&[Idx::INT32, Idx::INT8], false),
        struct_key(&[Idx::INT32, Idx::INT8], true)
    );
}

#[test]
fn shape_hash_ignores_component_identity() {
    let a = TypeKey::Pointer { elem: Idx::INT8 };
    let b = TypeKey::Pointer {
        elem: Idx::from_raw(100),
    };
    assert_ne!(a, b);
    assert_eq!(a.shape_hash(), b.shape_hash());
    assert!(a.same_shape(&b));
}

#[test]
fn shape_distinguishes_scalars() {
    let a = TypeKey::Array {
        elem: Idx::INT8,
        len: 4,
    };
    let b = TypeKey::Array {
        elem: Idx::INT8,
        len: 8,
    };
    assert!(!a.same_shape(&b));

    let v = TypeKey::Vector {
        elem: Idx::INT8,
        len: 4,
    };
    assert!(!a.same_shape(&v));
}

#[test]
fn function_components_start_with_return() {
    let key = TypeKey::Function {
        ret: Idx::VOID,
        params: [Idx::INT32, Idx::INT8].into(),
        var_args: true,
        attrs: Box::new([]),
    };
    assert_eq!(key.tag(), Tag::Function);
    assert_eq!(key.components(), vec![Idx::VOID, Idx::INT32, Idx::INT8]);
}

#[test]
fn integer_key_has_no_components() {
    let key = TypeKey::Integer { bits: 17 };
    assert_eq!(key.tag(), Tag::Integer);
    assert!(key.components().is_empty());
}
