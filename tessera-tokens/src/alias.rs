//! Alias index: every path suffix of every entry, first registration wins.

use std::collections::HashMap;

/// Maps dotted path suffixes to entry indices.
///
/// An entry at `a.b.c` is registered under `a.b.c`, `b.c` and `c`. A key already
/// claimed by an earlier entry is never overwritten, so later entries sharing a
/// suffix are only reachable through a longer, still-unclaimed key.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    keys: HashMap<String, usize>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all suffixes of `path` for `entry`.
    pub fn register(&mut self, path: &[String], entry: usize) {
        for start in 0..path.len() {
            let key = path[start..].join(".");
            self.keys.entry(key).or_insert(entry);
        }
    }

    /// Exact lookup of a reference key (surrounding whitespace ignored).
    pub fn resolve(&self, key: &str) -> Option<usize> {
        self.keys.get(key.trim()).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key.trim())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(dotted: &str) -> Vec<String> {
        dotted.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_all_suffixes_registered() {
        let mut index = AliasIndex::new();
        index.register(&path("Tokens.color.text.primary"), 0);
        for key in [
            "Tokens.color.text.primary",
            "color.text.primary",
            "text.primary",
            "primary",
        ] {
            assert_eq!(index.resolve(key), Some(0), "{}", key);
        }
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_first_registration_wins() {
        let mut index = AliasIndex::new();
        index.register(&path("Responsive/Desktop.typescale.body"), 0);
        index.register(&path("Responsive/Mobile.typescale.body"), 1);

        assert_eq!(index.resolve("typescale.body"), Some(0));
        assert_eq!(index.resolve("body"), Some(0));
        assert_eq!(index.resolve("Responsive/Mobile.typescale.body"), Some(1));
    }

    #[test]
    fn test_lookup_is_exact_after_trim() {
        let mut index = AliasIndex::new();
        index.register(&path("Tokens.spacing.sm"), 0);
        assert_eq!(index.resolve("  spacing.sm "), Some(0));
        assert_eq!(index.resolve("spacing"), None);
        assert_eq!(index.resolve("Spacing.sm"), None);
        assert!(!index.contains("pacing.sm"));
    }
}
