//! Turns nested JSON objects into a single level of `parent_child` fields.

use serde_json::{Map, Value};

/// Separator placed between the keys of nested objects.
pub const FIELD_SEPARATOR: &str = "_";

/// Flattens a JSON object into one level of fields.
///
/// - nested objects recurse, their keys joined with `separator`
///   (`{"sys": {"country": "GB"}}` becomes `sys_country`);
/// - empty nested objects contribute no field;
/// - arrays are kept whole as their compact JSON text;
/// - scalars are copied as-is.
///
/// If two paths flatten to the same key (`{"a_b": 1, "a": {"b": 2}}`), the one
/// visited last wins and the key keeps the position where it first appeared.
pub fn flatten_object(object: &Map<String, Value>, separator: &str) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(&mut out, None, object, separator);
    out
}

fn flatten_into(
    out: &mut Map<String, Value>,
    prefix: Option<&str>,
    object: &Map<String, Value>,
    separator: &str,
) {
    for (key, value) in object {
        let name = match prefix {
            Some(prefix) => format!("{prefix}{separator}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(out, Some(&name), nested, separator),
            Value::Array(_) => {
                out.insert(name, Value::String(value.to_string()));
            }
            scalar => {
                out.insert(name, scalar.clone());
            }
        }
    }
}
