//! The layered merge rule.
//!
//! Every merge in the crate (settings layers, style fragments, overrides)
//! goes through [`merge_value`]:
//!
//! | earlier        | later          | result                          |
//! |----------------|----------------|---------------------------------|
//! | array          | array          | earlier items, then later items |
//! | object         | object         | merged key by key, recursively  |
//! | anything else  | anything       | later value                     |

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// A property object for a single slot.
pub type Props = Map<String, Value>;

/// Settings for a whole component, keyed by slot name.
pub type ComponentSettings = BTreeMap<String, Props>;

/// Reserved settings entry carrying token values instead of slot props.
pub const TOKENS_KEY: &str = "tokens";

/// Merges `incoming` into `target`, with `incoming` taking precedence.
pub fn merge_value(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Array(existing), Value::Array(more)) => existing.extend(more),
        (Value::Object(existing), Value::Object(more)) => merge_props(existing, more),
        (slot, other) => *slot = other,
    }
}

/// Merges one property object into another.
pub fn merge_props(target: &mut Props, incoming: Props) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

/// Merges per-slot settings, slot by slot.
pub fn merge_settings(target: &mut ComponentSettings, incoming: ComponentSettings) {
    for (slot, props) in incoming {
        merge_props(target.entry(slot).or_default(), props);
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::String),
        ]
    }

    proptest! {
        #[test]
        fn later_scalar_always_wins(first in scalar(), second in scalar()) {
            let mut target = Props::new();
            target.insert("k".into(), first);
            let mut incoming = Props::new();
            incoming.insert("k".into(), second.clone());

            merge_props(&mut target, incoming);
            prop_assert_eq!(&target["k"], &second);
        }

        #[test]
        fn sequences_keep_every_item_in_order(
            first in prop::collection::vec("[a-z]{1,4}", 0..6),
            second in prop::collection::vec("[a-z]{1,4}", 0..6),
        ) {
            let mut target = Value::from(first.clone());
            merge_value(&mut target, Value::from(second.clone()));

            let expected: Vec<String> = first.into_iter().chain(second).collect();
            prop_assert_eq!(target, Value::from(expected));
        }

        #[test]
        fn merging_empty_is_identity(keys in prop::collection::btree_map("[a-z]{1,4}", scalar(), 0..6)) {
            let original: Props = keys.into_iter().collect();
            let mut target = original.clone();
            merge_props(&mut target, Props::new());
            prop_assert_eq!(target, original);
        }
    }
}
