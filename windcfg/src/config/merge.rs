//! JSON layer merging used when stacking presets and discovered files.

use serde_json::{Map, Value};

/// Merge `layer` into `target`.
///
/// Objects merge key by key at every depth. Arrays and scalars in `layer`
/// replace whatever `target` held.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use windcfg::merge_value;
///
/// let mut target = json!({"content": ["./a/**/*.rs"], "theme": {"extend": {"colors": {"a": "1"}}}});
/// merge_value(&mut target, json!({"content": ["./b/**/*.rs"], "theme": {"extend": {"colors": {"b": "2"}}}}));
/// assert_eq!(target, json!({
///     "content": ["./b/**/*.rs"],
///     "theme": {"extend": {"colors": {"a": "1", "b": "2"}}}
/// }));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => merge_object(target, map),
        _ => *target = layer,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Some(target_map) = target.as_object_mut() else {
        return;
    };
    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) if value.is_object() => merge_value(existing, value),
            _ => {
                target_map.insert(key, value);
            }
        }
    }
}
