//! Event key-space rewriting applied before schema inference.
//!
//! Two rewrites run together at every nesting level of an event:
//!
//! - **Volatile-key stabilization**: keys shaped like an MD5 digest followed
//!   by two numeric counters never repeat across events, so each one is
//!   collapsed onto a synthetic stable name (`MD5HASH_int_int_<n>`) that
//!   dedupes during merging.
//! - **Embedded JSON expansion**: a string value that parses to a JSON
//!   object is replaced by the parsed map under a `_JSON`-suffixed key, so
//!   its interior structure gets inferred instead of a bare string.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// 32 lowercase hex characters followed by two numeric counters.
static VOLATILE_KEY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-f0-9]{32}_[0-9]+_[0-9]+$").unwrap());

/// Rewrite one event map, recursing into nested maps. The input is left
/// untouched.
///
/// The volatile-key counter is local to each nesting level: every recursive
/// call numbers its own keys from `MD5HASH_int_int_0` again. Key names
/// within a level stay deterministic without any cross-event coordination.
pub fn preprocess(event: &Map<String, Value>) -> Map<String, Value> {
    let mut count = 0;
    let mut result = Map::new();

    for (key, value) in event {
        let key = if VOLATILE_KEY_REGEX.is_match(key) {
            let stable = format!("MD5HASH_int_int_{}", count);
            count += 1;
            stable
        } else {
            key.clone()
        };

        match value {
            Value::Object(nested) => {
                result.insert(key, Value::Object(preprocess(nested)));
            }
            Value::String(text) => {
                // Only strings embedding a whole JSON object are expanded;
                // strings parsing to arrays or scalars pass through as-is.
                match serde_json::from_str::<Value>(text) {
                    Ok(Value::Object(parsed)) => {
                        result.insert(format!("{}_JSON", key), Value::Object(preprocess(&parsed)));
                    }
                    _ => {
                        result.insert(key, value.clone());
                    }
                }
            }
            other => {
                result.insert(key, other.clone());
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(preprocess(&map)),
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_volatile_keys_are_numbered_within_a_level() {
        let event = json!({
            "0e4e3b2681e8931c067a23c583c878d5_1_2": "a",
            "6185ad8f9b97d91721ab0438b4a2048b_21_66": "b",
            "stable": "c"
        });

        assert_eq!(
            run(event),
            json!({
                "MD5HASH_int_int_0": "a",
                "MD5HASH_int_int_1": "b",
                "stable": "c"
            })
        );
    }

    #[test]
    fn test_numbering_follows_insertion_order() {
        let event = json!({
            "6185ad8f9b97d91721ab0438b4a2048b_21_66": "first",
            "0e4e3b2681e8931c067a23c583c878d5_1_2": "second"
        });

        assert_eq!(
            run(event),
            json!({
                "MD5HASH_int_int_0": "first",
                "MD5HASH_int_int_1": "second"
            })
        );
    }

    #[test]
    fn test_counter_resets_in_nested_maps() {
        let event = json!({
            "098f6bcd4621d373cade4e832627b4f6_1_1": {
                "0e4e3b2681e8931c067a23c583c878d5_1_2": "inner"
            },
            "6185ad8f9b97d91721ab0438b4a2048b_1_3": "outer"
        });

        // The nested map starts counting at zero again.
        assert_eq!(
            run(event),
            json!({
                "MD5HASH_int_int_0": {"MD5HASH_int_int_0": "inner"},
                "MD5HASH_int_int_1": "outer"
            })
        );
    }

    #[test]
    fn test_near_miss_keys_are_left_alone() {
        let event = json!({
            // 31 hex characters
            "98f6bcd4621d373cade4e832627b4f6_1_1": 1,
            // uppercase hex
            "098F6BCD4621D373CADE4E832627B4F6_1_1": 2,
            // missing second counter
            "098f6bcd4621d373cade4e832627b4f6_1": 3
        });

        assert_eq!(run(event.clone()), event);
    }

    #[test]
    fn test_json_object_string_is_expanded() {
        let event = json!({"event": "{\"bar\": \"baz\"}"});

        assert_eq!(run(event), json!({"event_JSON": {"bar": "baz"}}));
    }

    #[test]
    fn test_expansion_recurses_into_parsed_map() {
        let event = json!({
            "event": "{\"098f6bcd4621d373cade4e832627b4f6_1_1\": {\"deep\": \"{\\\"x\\\": 1}\"}}"
        });

        assert_eq!(
            run(event),
            json!({
                "event_JSON": {
                    "MD5HASH_int_int_0": {"deep_JSON": {"x": 1}}
                }
            })
        );
    }

    #[test]
    fn test_non_object_json_strings_pass_through() {
        let event = json!({
            "number": "123",
            "array": "[1, 2]",
            "boolean": "true",
            "null": "null",
            "not_json": "hello world"
        });

        assert_eq!(run(event.clone()), event);
    }

    #[test]
    fn test_volatile_key_with_map_value_is_renamed_and_recursed() {
        let event = json!({
            "098f6bcd4621d373cade4e832627b4f6_1_1": {"inner": "{\"a\": 1}"}
        });

        assert_eq!(
            run(event),
            json!({"MD5HASH_int_int_0": {"inner_JSON": {"a": 1}}})
        );
    }

    #[test]
    fn test_scalars_and_arrays_pass_through() {
        let event = json!({
            "n": 1,
            "f": 1.5,
            "b": false,
            "z": null,
            "list": [{"k": "v"}, 2]
        });

        // Rewrites apply to map values only; maps inside arrays are kept.
        assert_eq!(run(event.clone()), event);
    }
}
