//! Token descriptions keyed by generated SCSS name.

use crate::document::TokenDocument;
use crate::sanitize::build_name;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// `$description` text for every described token, keyed by lowercased `$name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenDescriptions {
    by_name: HashMap<String, String>,
}

impl TokenDescriptions {
    /// Collect descriptions from a document. When two tokens share a generated
    /// name, the later one in document order wins.
    pub fn from_document(document: &TokenDocument) -> Self {
        let mut descriptions = Self::default();
        descriptions.collect(document.root(), &mut Vec::new());
        descriptions
    }

    fn collect(&mut self, node: &Map<String, Value>, path: &mut Vec<String>) {
        for (key, value) in node {
            let Value::Object(child) = value else {
                continue;
            };
            path.push(key.clone());
            if child.contains_key("$value") {
                let described = child
                    .get("$description")
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty());
                let name = build_name(path);
                if let (Some(text), false) = (described, name.is_empty()) {
                    self.by_name
                        .insert(format!("${}", name).to_lowercase(), text.to_string());
                }
            } else {
                self.collect(child, path);
            }
            path.pop();
        }
    }

    /// Description for a name, with or without the leading `$`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(&dollar_lower(name)).map(String::as_str)
    }

    /// All descriptions whose name starts with `prefix`.
    pub fn by_prefix(&self, prefix: &str) -> BTreeMap<&str, &str> {
        let prefix = dollar_lower(prefix);
        self.by_name
            .iter()
            .filter(|(name, _)| name.starts_with(&prefix))
            .map(|(name, text)| (name.as_str(), text.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn dollar_lower(name: &str) -> String {
    if name.starts_with('$') {
        name.to_lowercase()
    } else {
        format!("${}", name).to_lowercase()
    }
}
