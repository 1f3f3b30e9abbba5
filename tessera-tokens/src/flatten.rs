//! Token flattener: nested token tree to an ordered list of leaf entries.

use crate::format::ShapeKind;
use crate::sanitize::sanitize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One leaf token.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    /// Raw path as written in the document, group first.
    pub path: Vec<String>,
    /// `path` joined with `.`; unique per entry and used for alias keys.
    pub path_key: String,
    /// Sanitized semantic segments after group rewriting.
    pub segments: Vec<String>,
    /// Hyphen-joined `segments`; not unique across groups.
    pub name: String,
    pub raw_value: Value,
    pub token_type: Option<String>,
    pub description: Option<String>,
    pub shape: ShapeKind,
}

impl FlatEntry {
    /// The group this entry belongs to (first path element).
    pub fn group(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or_default()
    }
}

/// Flatten a document root (or any subtree) in source order.
///
/// Entries with an empty sanitized name are skipped. A path key produced twice
/// (`"a.b"` as a literal key next to `a` -> `b`) keeps its first entry.
pub fn flatten(root: &Map<String, Value>) -> Vec<FlatEntry> {
    let mut walker = Walker::default();
    for (key, child) in root {
        if key.starts_with('$') {
            continue;
        }
        walker.visit(child, vec![key.clone()]);
    }
    walker.entries
}

#[derive(Default)]
struct Walker {
    entries: Vec<FlatEntry>,
    seen: HashSet<String>,
}

impl Walker {
    fn visit(&mut self, node: &Value, path: Vec<String>) {
        match node {
            Value::Null => {}
            Value::Object(map) => {
                if let Some(value) = map.get("$value") {
                    let token_type = map.get("$type").and_then(Value::as_str).map(str::to_string);
                    let description = map
                        .get("$description")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    self.push(path, terminal_value(value), token_type, description);
                    return;
                }

                if let Some(value) = map.get("value").filter(|v| !v.is_object() && !v.is_array() && !v.is_null()) {
                    self.push(path, value.clone(), None, None);
                    return;
                }

                for (key, child) in map {
                    if key.starts_with('$') {
                        continue;
                    }
                    let mut child_path = path.clone();
                    child_path.push(key.clone());
                    self.visit(child, child_path);
                }
            }
            leaf => self.push(path, leaf.clone(), None, None),
        }
    }

    fn push(
        &mut self,
        path: Vec<String>,
        raw_value: Value,
        token_type: Option<String>,
        description: Option<String>,
    ) {
        if path.is_empty() {
            return;
        }
        let segments = sanitize(&path);
        if segments.is_empty() {
            return;
        }
        let path_key = path.join(".");
        if !self.seen.insert(path_key.clone()) {
            tracing::debug!(path = %path_key, "duplicate token path, keeping first entry");
            return;
        }

        let shape = ShapeKind::of(&raw_value);
        self.entries.push(FlatEntry {
            name: segments.join("-"),
            path,
            path_key,
            segments,
            raw_value,
            token_type,
            description,
            shape,
        });
    }
}

/// Unwrap nested `$value` wrappers down to the authored value. Composite
/// objects without `$value` are terminal.
fn terminal_value(value: &Value) -> Value {
    let mut current = value;
    while let Some(inner) = current.as_object().and_then(|map| map.get("$value")) {
        current = inner;
    }
    current.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_value_nodes_become_entries() {
        let entries = flatten(&root(json!({
            "Primitives": {
                "colors": {
                    "brand": {
                        "teal-500": {"$value": "#0f766e", "$type": "color", "$description": "Brand teal"}
                    }
                }
            }
        })));
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.path_key, "Primitives.colors.brand.teal-500");
        assert_eq!(entry.name, "brand-teal-500");
        assert_eq!(entry.segments, vec!["brand", "teal-500"]);
        assert_eq!(entry.raw_value, json!("#0f766e"));
        assert_eq!(entry.token_type.as_deref(), Some("color"));
        assert_eq!(entry.description.as_deref(), Some("Brand teal"));
        assert_eq!(entry.group(), "Primitives");
        assert_eq!(entry.shape, ShapeKind::Scalar);
    }

    #[test]
    fn test_composite_value_is_terminal() {
        let entries = flatten(&root(json!({
            "Elevation": {
                "raised": {
                    "$value": [
                        {"type": "dropShadow", "x": 0, "y": 1, "blur": 2, "spread": 0, "color": "{color.shadow}"}
                    ],
                    "$type": "boxShadow"
                }
            }
        })));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "raised");
        assert_eq!(entries[0].shape, ShapeKind::Shadow);
    }

    #[test]
    fn test_nested_value_wrappers_unwrapped() {
        let entries = flatten(&root(json!({
            "Tokens": {"gap": {"$value": {"$value": 8}}}
        })));
        assert_eq!(entries[0].raw_value, json!(8));
    }

    #[test]
    fn test_plain_value_key_fallback() {
        let entries = flatten(&root(json!({
            "Tokens": {
                "legacy": {"value": "12px", "type": "spacing"},
                "nested": {"value": {"x": 1}}
            }
        })));
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["legacy", "nested-value-x"]);
        assert_eq!(entries[0].raw_value, json!("12px"));
    }

    #[test]
    fn test_bare_scalars_and_arrays_are_leaves() {
        let entries = flatten(&root(json!({
            "Motion": {
                "durations": {"fast": 100},
                "easings": {"standard": [0.4, 0, 0.2, 1]}
            }
        })));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "durations-fast");
        assert_eq!(entries[1].name, "easings-standard");
        assert_eq!(entries[1].shape, ShapeKind::MotionCurve);
    }

    #[test]
    fn test_metadata_skipped_and_order_preserved() {
        let doc: Value = serde_json::from_str(
            r#"{
                "$metadata": {"tokenSetOrder": ["Tokens"]},
                "Tokens": {
                    "z": {"$value": 1, "$extensions": {"x": {"$value": 9}}},
                    "a": {"$value": 2}
                },
                "$themes": []
            }"#,
        )
        .unwrap();
        let entries = flatten(&root(doc));
        let keys: Vec<&str> = entries.iter().map(|e| e.path_key.as_str()).collect();
        assert_eq!(keys, vec!["Tokens.z", "Tokens.a"]);
    }

    #[test]
    fn test_empty_names_and_null_skipped() {
        let entries = flatten(&root(json!({
            "Tokens": {"***": {"$value": 1}, "gone": null},
            "Version": "2"
        })));
        assert!(entries.is_empty());
    }

    #[test]
    fn test_duplicate_path_keys_keep_first() {
        let entries = flatten(&root(json!({
            "Tokens": {
                "a.b": {"$value": 1},
                "a": {"b": {"$value": 2}}
            }
        })));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].raw_value, json!(1));
    }
}
