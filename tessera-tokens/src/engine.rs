//! Build-time token engine: flat entries, alias index, and a resolver over both.
//!
//! One engine is constructed per run. All caches live inside it, so two engines
//! built from the same document never share state and always agree.

use crate::alias::AliasIndex;
use crate::document::TokenDocument;
use crate::flatten::{flatten, FlatEntry};
use crate::format::{stringify_as, ShapeKind};
use crate::resolver::{ReferenceTable, Resolver, BRACE_REFERENCE};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tessera_core::{Diagnostic, Dialect, ReferencePolicy, Target};

// ============================================================================
// TOKEN TABLE
// ============================================================================

/// Flat entries addressed by `{dotted.path}` suffix references.
#[derive(Debug, Clone)]
pub struct TokenTable {
    entries: Vec<FlatEntry>,
    aliases: AliasIndex,
}

impl TokenTable {
    /// Index entries in order; earlier entries own shared suffixes.
    pub fn new(entries: Vec<FlatEntry>) -> Self {
        let mut aliases = AliasIndex::new();
        for (idx, entry) in entries.iter().enumerate() {
            aliases.register(&entry.path, idx);
        }
        Self { entries, aliases }
    }

    pub fn entries(&self) -> &[FlatEntry] {
        &self.entries
    }

    pub fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }
}

impl ReferenceTable for TokenTable {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn reference_pattern(&self) -> &Regex {
        &BRACE_REFERENCE
    }

    fn lookup(&self, key: &str) -> Option<usize> {
        self.aliases.resolve(key)
    }

    fn entry_key(&self, entry: usize) -> &str {
        &self.entries[entry].path_key
    }

    fn raw_value(&self, entry: usize) -> &Value {
        &self.entries[entry].raw_value
    }

    fn handle(&self, entry: usize) -> String {
        format!("${}", self.entries[entry].name)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Resolution context for one run over one document.
#[derive(Debug)]
pub struct TokenEngine {
    resolver: Resolver<TokenTable>,
    by_path: HashMap<String, usize>,
}

impl TokenEngine {
    pub fn new(entries: Vec<FlatEntry>, policy: ReferencePolicy) -> Self {
        let by_path = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.path_key.clone(), idx))
            .collect();
        let resolver = Resolver::new(TokenTable::new(entries), policy);
        tracing::debug!(entries = resolver.table().len(), "token engine ready");
        Self { resolver, by_path }
    }

    /// Flatten a whole document and index it.
    pub fn from_document(document: &TokenDocument, policy: ReferencePolicy) -> Self {
        Self::new(flatten(document.root()), policy)
    }

    pub fn entries(&self) -> &[FlatEntry] {
        self.resolver.table().entries()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Entry by its full dotted path.
    pub fn entry(&self, path_key: &str) -> Option<&FlatEntry> {
        self.by_path.get(path_key).map(|idx| &self.entries()[*idx])
    }

    /// Entry owning a reference key (any registered suffix).
    pub fn lookup_alias(&self, key: &str) -> Option<&FlatEntry> {
        self.resolver
            .table()
            .aliases()
            .resolve(key)
            .map(|idx| &self.entries()[idx])
    }

    /// Resolve an entry by its full dotted path.
    pub fn resolve(&self, path_key: &str, target: Target) -> Option<Value> {
        self.by_path
            .get(path_key)
            .map(|idx| self.resolver.resolve(*idx, target))
    }

    /// Resolve an entry by index into [`entries`](Self::entries).
    pub fn resolve_entry(&self, idx: usize, target: Target) -> Value {
        self.resolver.resolve(idx, target)
    }

    /// Resolve and render an entry as declaration text, dispatching on the shape
    /// recorded when the entry was flattened.
    pub fn render_entry(&self, idx: usize, target: Target, dialect: Dialect) -> String {
        let kind = self
            .entries()
            .get(idx)
            .map(|entry| entry.shape)
            .unwrap_or(ShapeKind::Scalar);
        stringify_as(&self.resolve_entry(idx, target), kind, dialect)
    }

    /// Entries belonging to a group, with their indices, in flatten order.
    pub fn group_entries<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = (usize, &'a FlatEntry)> + 'a {
        self.entries()
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.group() == group)
    }

    /// Non-fatal conditions seen so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.resolver.diagnostics()
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::resolver::is_exact_brace_reference;
    use proptest::prelude::*;
    use serde_json::{json, Map};

    /// A reference chain `t0 <- t1 <- ... <- tn` with optional text around each link.
    fn arb_chain() -> impl Strategy<Value = Vec<(bool, String)>> {
        prop::collection::vec((any::<bool>(), "[a-z]{0,3}"), 1..12)
    }

    fn chain_engine(links: &[(bool, String)]) -> TokenEngine {
        let mut group = Map::new();
        group.insert("t0".to_string(), json!({"$value": "8px"}));
        for (i, (exact, pad)) in links.iter().enumerate() {
            let reference = format!("{{t{}}}", i);
            let value = if *exact {
                reference
            } else {
                format!("{} {}", pad, reference)
            };
            group.insert(format!("t{}", i + 1), json!({ "$value": value }));
        }
        let document = TokenDocument::from_value(json!({ "Tokens": group })).unwrap();
        TokenEngine::from_document(&document, ReferencePolicy::Ignore)
    }

    proptest! {
        #[test]
        fn prop_concrete_has_no_references(links in arb_chain()) {
            let engine = chain_engine(&links);
            for idx in 0..engine.len() {
                let text = engine.render_entry(idx, Target::Concrete, Dialect::Css);
                prop_assert!(!BRACE_REFERENCE.is_match(&text), "{}", text);
            }
        }

        #[test]
        fn prop_resolution_idempotent_and_deterministic(links in arb_chain()) {
            let engine = chain_engine(&links);
            let fresh = chain_engine(&links);
            for idx in (0..engine.len()).rev() {
                for target in Target::ALL {
                    let once = engine.resolve_entry(idx, target);
                    let twice = engine.resolve_entry(idx, target);
                    prop_assert_eq!(&once, &twice);
                    prop_assert_eq!(once, fresh.resolve_entry(idx, target));
                }
            }
        }

        #[test]
        fn prop_symbolic_exact_references_become_handles(links in arb_chain()) {
            let engine = chain_engine(&links);
            for (idx, entry) in engine.entries().iter().enumerate() {
                let raw = entry.raw_value.as_str().unwrap_or_default();
                if is_exact_brace_reference(raw) {
                    let value = engine.resolve_entry(idx, Target::Symbolic);
                    prop_assert!(value.as_str().is_some_and(|s| s.starts_with('$')));
                }
            }
        }
    }
}
