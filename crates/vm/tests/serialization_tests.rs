use proptest::prelude::*;
use sidechain_vm::stack_item::serialization::{deserialize, serialize};
use sidechain_vm::{ExecutionEngineLimits, StackItem, StackMap};

fn scalar() -> impl Strategy<Value = StackItem> {
    prop_oneof![
        any::<bool>().prop_map(StackItem::from_bool),
        any::<i64>().prop_map(StackItem::from),
        prop::collection::vec(any::<u8>(), 0..48).prop_map(StackItem::from_bytes),
    ]
}

fn stack_item() -> impl Strategy<Value = StackItem> {
    scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(StackItem::new_array),
            prop::collection::vec(inner.clone(), 0..6).prop_map(StackItem::new_struct),
            prop::collection::vec((prop::collection::vec(any::<u8>(), 0..8), inner), 0..6)
                .prop_map(|entries| {
                    let mut map = StackMap::new();
                    for (key, value) in entries {
                        map.insert(StackItem::from_bytes(key), value);
                    }
                    StackItem::from_map(map)
                }),
        ]
    })
}

proptest! {
    #[test]
    fn acyclic_values_survive_a_round_trip(item in stack_item()) {
        let limits = ExecutionEngineLimits::DEFAULT;
        let bytes = serialize(&item, &limits).unwrap();
        let decoded = deserialize(&bytes, &limits).unwrap();
        prop_assert_eq!(decoded.item_type(), item.item_type());
        prop_assert!(decoded.equals(&item));
        prop_assert_eq!(serialize(&decoded, &limits).unwrap(), bytes);
    }

    #[test]
    fn truncated_encodings_are_rejected(item in stack_item(), cut in 1usize..8) {
        let limits = ExecutionEngineLimits::DEFAULT;
        let bytes = serialize(&item, &limits).unwrap();
        prop_assume!(cut <= bytes.len());
        prop_assert!(deserialize(&bytes[..bytes.len() - cut], &limits).is_err());
    }
}

#[test]
fn test_size_limit_is_enforced() {
    let limits = ExecutionEngineLimits {
        max_item_size: 16,
        ..ExecutionEngineLimits::DEFAULT
    };
    let item = StackItem::from_bytes(vec![0u8; 32]);
    assert!(serialize(&item, &limits).is_err());
}
