//! `fixJSON` — attach a parser's produced value to the object being built
//! for the current rule, per the edge name that produced it (§4.5.4):
//! `"-"` discards it, `"."` splices the produced object's own keys into the
//! parent, and any other name attaches it nested under that key.

use crate::pdag::EdgeName;
use serde_json::{Map, Value};

/// Apply one edge's produced value to `target` according to `name`.
/// `target` is always a JSON object under construction; `value` is `None`
/// when the edge's parser doesn't produce a value (e.g. `stop_field` asked
/// not to report one) or when the name is `Discard` and the caller chose
/// not to bother computing it.
pub fn attach(target: &mut Map<String, Value>, name: &EdgeName, value: Option<Value>) {
    match name {
        EdgeName::Discard => {}
        EdgeName::Merge => match value {
            Some(Value::Object(nested)) => {
                for (key, v) in nested {
                    target.insert(key, v);
                }
            }
            // Not an object: fall through to the default case and attach
            // it under the literal name "." (spec.md §4.5.1).
            Some(v) => {
                target.insert(".".to_string(), v);
            }
            None => {}
        },
        EdgeName::Field(key) => {
            if let Some(v) = value {
                target.insert(key.clone(), v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn discard_drops_the_value() {
        let mut target = Map::new();
        attach(&mut target, &EdgeName::Discard, Some(json!("ignored")));
        assert!(target.is_empty());
    }

    #[test]
    fn field_nests_the_value_under_its_key() {
        let mut target = Map::new();
        attach(&mut target, &EdgeName::Field("host".into()), Some(json!("10.0.0.1")));
        assert_eq!(target.get("host"), Some(&json!("10.0.0.1")));
    }

    #[test]
    fn merge_splices_object_keys_into_the_parent() {
        let mut target = Map::new();
        target.insert("existing".into(), json!(1));
        attach(
            &mut target,
            &EdgeName::Merge,
            Some(json!({"a": 1, "b": 2})),
        );
        assert_eq!(target.get("existing"), Some(&json!(1)));
        assert_eq!(target.get("a"), Some(&json!(1)));
        assert_eq!(target.get("b"), Some(&json!(2)));
    }

    #[test]
    fn merge_attaches_non_object_values_under_the_literal_dot_key() {
        let mut target = Map::new();
        attach(&mut target, &EdgeName::Merge, Some(json!("not an object")));
        assert_eq!(target.get("."), Some(&json!("not an object")));
    }

    #[test]
    fn field_with_no_value_leaves_target_untouched() {
        let mut target = Map::new();
        attach(&mut target, &EdgeName::Field("host".into()), None);
        assert!(target.is_empty());
    }
}
