use serde_json::{Map, Value};

/// Field-by-field merge of a typed partial onto a statically known record.
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

/// Deep-merges `partials`, in order, onto `base` and returns the result.
///
/// A missing or `null` base starts from an empty mapping. Partials that are
/// missing, `null` or not mappings are skipped. For every key of a partial:
/// nested mappings merge recursively onto the mapping already under that key,
/// keeping keys the partial does not mention; sequences are rebuilt at the
/// partial's length with each element merged by index onto an empty slot, so
/// the previous sequence does not survive; anything else replaces the base
/// value.
pub fn extend(base: Option<Value>, partials: &[Option<&Value>]) -> Value {
    let mut base = match base {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for partial in partials.iter().flatten() {
        if let Value::Object(entries) = partial {
            extend_map(&mut base, entries);
        }
    }

    Value::Object(base)
}

fn extend_map(base: &mut Map<String, Value>, partial: &Map<String, Value>) {
    for (key, value) in partial {
        match value {
            Value::Object(nested) => {
                let slot = base
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(existing) = slot {
                    extend_map(existing, nested);
                }
            }
            Value::Array(items) => {
                base.insert(key.clone(), Value::Array(rebuild(items)));
            }
            scalar => {
                base.insert(key.clone(), scalar.clone());
            }
        }
    }
}

fn rebuild(items: &[Value]) -> Vec<Value> {
    items
        .iter()
        .map(|item| match item {
            Value::Object(nested) => {
                let mut slot = Map::new();
                extend_map(&mut slot, nested);
                Value::Object(slot)
            }
            Value::Array(inner) => Value::Array(rebuild(inner)),
            scalar => scalar.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_scalars_overwrite() {
        let merged = extend(Some(json!({"a": 1})), &[Some(&json!({"a": "s"}))]);
        assert_eq!(merged, json!({"a": "s"}));

        let merged = extend(Some(json!({"a": 1, "b": true})), &[Some(&json!({"b": null}))]);
        assert_eq!(merged, json!({"a": 1, "b": null}));
    }

    #[test]
    fn test_nested_keys_are_preserved() {
        let merged = extend(Some(json!({"x": {"a": 1, "b": 2}})), &[Some(&json!({"x": {"a": 9}}))]);
        assert_eq!(merged, json!({"x": {"a": 9, "b": 2}}));
    }

    #[test]
    fn test_deep_nesting() {
        let base = json!({"x": {"y": {"z": 1, "keep": "me"}, "other": [1]}});
        let partial = json!({"x": {"y": {"z": 2, "new": {"deep": true}}}});

        assert_eq!(
            extend(Some(base), &[Some(&partial)]),
            json!({"x": {"y": {"z": 2, "keep": "me", "new": {"deep": true}}, "other": [1]}})
        );
    }

    #[test]
    fn test_nested_mapping_replaces_scalar_slot() {
        let merged = extend(Some(json!({"x": 5})), &[Some(&json!({"x": {"a": 1}}))]);
        assert_eq!(merged, json!({"x": {"a": 1}}));
    }

    #[test]
    fn test_sequences_are_rebuilt_at_partial_length() {
        let merged = extend(Some(json!({"x": [1, 2, 3]})), &[Some(&json!({"x": [9]}))]);
        assert_eq!(merged, json!({"x": [9]}));

        let merged = extend(Some(json!({"x": [1]})), &[Some(&json!({"x": [7, 8]}))]);
        assert_eq!(merged, json!({"x": [7, 8]}));
    }

    #[test]
    fn test_sequence_elements_merge_onto_empty_slots() {
        let base = json!({"rows": [{"a": 1, "b": 2}]});
        let partial = json!({"rows": [{"a": 9}, [1, {"c": 3}], "s"]});

        assert_eq!(
            extend(Some(base), &[Some(&partial)]),
            json!({"rows": [{"a": 9}, [1, {"c": 3}], "s"]})
        );
    }

    #[test]
    fn test_missing_base_and_partials() {
        assert_eq!(extend(None, &[]), json!({}));
        assert_eq!(extend(Some(Value::Null), &[Some(&json!({"a": 1}))]), json!({"a": 1}));

        let skipped = extend(
            Some(json!({"a": 1})),
            &[None, Some(&Value::Null), Some(&json!("text")), Some(&json!([1, 2])), Some(&json!({}))],
        );
        assert_eq!(skipped, json!({"a": 1}));
    }

    #[test]
    fn test_later_partials_win() {
        let a = json!({"title": "first", "nested": {"k": 1, "j": 1}});
        let b = json!({"title": "second", "nested": {"k": 2}});

        assert_eq!(
            extend(Some(json!({"title": "base"})), &[Some(&a), Some(&b)]),
            json!({"title": "second", "nested": {"k": 2, "j": 1}})
        );
    }

    #[test]
    fn test_left_associative() {
        let base = json!({"x": {"a": 1, "b": 2}, "s": [1, 2, 3], "t": "base"});
        let a = json!({"x": {"a": 5, "c": {"d": 1}}, "s": [4]});
        let b = json!({"x": {"c": {"e": 2}}, "t": false});

        let stepwise = extend(Some(extend(Some(base.clone()), &[Some(&a)])), &[Some(&b)]);
        let at_once = extend(Some(base), &[Some(&a), Some(&b)]);

        assert_eq!(stepwise, at_once);
        assert_eq!(
            at_once,
            json!({"x": {"a": 5, "b": 2, "c": {"d": 1, "e": 2}}, "s": [4], "t": false})
        );
    }

    #[test]
    fn test_partials_are_not_aliased() {
        let partial = json!({"x": {"a": 1}});
        let mut merged = extend(None, &[Some(&partial)]);
        merged["x"]["a"] = json!(2);

        assert_eq!(partial, json!({"x": {"a": 1}}));
    }
}
