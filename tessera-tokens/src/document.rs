//! Token document model and group planning.
//!
//! A document is the JSON object exported from the design tool: top-level keys are
//! groups, plus optional `$metadata` / `$themes`. Key order is significant and is
//! preserved from the source text.

use serde_json::{Map, Value};
use tessera_core::{DocumentError, PipelineConfig, TesseraResult, MOTION_GROUP};

/// Top-level keys that are structural, never groups.
const EXCLUDED_KEYS: [&str; 2] = ["$metadata", "$themes"];

/// A parsed token document.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDocument {
    root: Map<String, Value>,
    motion_merged: bool,
}

impl TokenDocument {
    /// Parse document text. Blank text is a missing document.
    pub fn parse(text: &str) -> TesseraResult<Self> {
        if text.trim().is_empty() {
            return Err(DocumentError::Missing.into());
        }
        let value: Value = serde_json::from_str(text).map_err(|err| DocumentError::InvalidJson {
            reason: err.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed value; the root must be an object.
    pub fn from_value(value: Value) -> TesseraResult<Self> {
        match value {
            Value::Object(root) => Ok(Self {
                root,
                motion_merged: false,
            }),
            other => Err(DocumentError::NotAnObject {
                found: json_kind(&other).to_string(),
            }
            .into()),
        }
    }

    /// Merge an auxiliary motion document whose root holds a `Motion` object.
    ///
    /// When both sources define `Motion`, the main document's group wins and the
    /// auxiliary one is dropped. A motion document without a `Motion` object is ignored.
    pub fn with_motion_source(mut self, text: &str) -> TesseraResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|err| DocumentError::InvalidMotionSource {
                reason: err.to_string(),
            })?;

        let Some(motion) = value.get(MOTION_GROUP).filter(|m| m.is_object()) else {
            tracing::debug!("motion source has no Motion object, skipping");
            return Ok(self);
        };

        if self.root.contains_key(MOTION_GROUP) {
            tracing::debug!("main document defines Motion, auxiliary motion source dropped");
        } else {
            self.root.insert(MOTION_GROUP.to_string(), motion.clone());
        }
        self.motion_merged = true;
        Ok(self)
    }

    /// The root object.
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// A group's subtree, if present.
    pub fn group(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Group processing order.
    ///
    /// `$metadata.tokenSetOrder` wins when present; otherwise object-valued top-level
    /// keys in source order, skipping `$metadata` and `$themes`. A merged motion
    /// source appends `Motion` if it is not already listed.
    pub fn group_order(&self) -> Vec<String> {
        let declared = self
            .root
            .get("$metadata")
            .and_then(|meta| meta.get("tokenSetOrder"))
            .and_then(Value::as_array);

        let mut order: Vec<String> = match declared {
            Some(list) => list
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => self
                .root
                .iter()
                .filter(|(key, _)| !EXCLUDED_KEYS.contains(&key.as_str()))
                .filter(|(_, value)| value.is_object())
                .map(|(key, _)| key.clone())
                .collect(),
        };

        if self.motion_merged && !order.iter().any(|key| key == MOTION_GROUP) {
            order.push(MOTION_GROUP.to_string());
        }
        order
    }

    /// Rewrite `{<prefix>.` references inside `group` to `{<group>.<prefix>.`.
    ///
    /// Covers `$value` strings and composite members; other `$` metadata is untouched.
    pub fn qualify_references(&mut self, group: &str, prefixes: &[String]) {
        if prefixes.is_empty() {
            return;
        }
        let replacements: Vec<(String, String)> = prefixes
            .iter()
            .map(|prefix| (format!("{{{}.", prefix), format!("{{{}.{}.", group, prefix)))
            .collect();

        if let Some(node) = self.root.get_mut(group) {
            qualify_node(node, &replacements);
        }
    }

    /// Run every configured preprocessor.
    pub fn apply_config(&mut self, config: &PipelineConfig) {
        for (key, group) in &config.groups {
            if self.root.contains_key(key) {
                self.qualify_references(key, &group.qualify_references);
            }
        }
    }
}

fn qualify_node(node: &mut Value, replacements: &[(String, String)]) {
    match node {
        Value::String(text) => {
            for (from, to) in replacements {
                if text.contains(from.as_str()) {
                    *text = text.replace(from.as_str(), to);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                qualify_node(item, replacements);
            }
        }
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key.starts_with('$') && key != "$value" {
                    continue;
                }
                qualify_node(child, replacements);
            }
        }
        _ => {}
    }
}

/// File stem for a group: lowercase, `/` to `-`, whitespace runs to `-`.
pub fn file_stem(group: &str) -> String {
    let lowered = group.to_lowercase().replace('/', "-");
    let mut stem = String::with_capacity(lowered.len());
    let mut in_space = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_space {
                stem.push('-');
            }
            in_space = true;
        } else {
            stem.push(ch);
            in_space = false;
        }
    }
    stem
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
