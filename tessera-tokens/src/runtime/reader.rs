//! Runtime token reader over generated SCSS declaration sheets.

use crate::resolver::{ReferenceTable, Resolver};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tessera_core::{Diagnostic, ReferencePolicy, Target};

/// One `$name: value;` declaration per line.
static DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)\$([a-z0-9-]+):\s*(.+?);\s*$").expect("static pattern"));

/// `$name` reference inside a declaration value; group 1 is the name.
static NAME_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$([a-z0-9-]+)").expect("static pattern"));

fn normalize_name(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

fn strip_outer_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

// ============================================================================
// NAME TABLE
// ============================================================================

/// Declarations extracted from sheets, first registration wins.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: Vec<String>,
    raws: Vec<Value>,
    index: HashMap<String, usize>,
}

impl NameTable {
    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for sheet in sheets {
            for caps in DECLARATION.captures_iter(sheet.as_ref()) {
                let (Some(name), Some(raw)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };
                table.insert(name.as_str(), raw.as_str().trim());
            }
        }
        table
    }

    fn insert(&mut self, name: &str, raw: &str) {
        if self.index.contains_key(name) {
            return;
        }
        self.index.insert(name.to_string(), self.names.len());
        self.names.push(name.to_string());
        self.raws.push(Value::String(raw.to_string()));
    }

    fn raw_text(&self, entry: usize) -> &str {
        self.raws[entry].as_str().unwrap_or_default()
    }
}

impl ReferenceTable for NameTable {
    fn len(&self) -> usize {
        self.names.len()
    }

    fn reference_pattern(&self) -> &Regex {
        &NAME_REFERENCE
    }

    fn lookup(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn entry_key(&self, entry: usize) -> &str {
        &self.names[entry]
    }

    fn raw_value(&self, entry: usize) -> &Value {
        &self.raws[entry]
    }

    fn handle(&self, entry: usize) -> String {
        format!("${}", self.names[entry])
    }

    fn finish(&self, value: Value) -> Value {
        match value {
            Value::String(text) => Value::String(strip_outer_quotes(&text).to_string()),
            other => other,
        }
    }
}

// ============================================================================
// READER
// ============================================================================

/// A declared token as listed by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    /// Name with its leading `$`.
    pub name: String,
    /// Declared text, as written in the sheet.
    pub raw: String,
    /// Concrete value, falling back to `raw`.
    pub value: String,
}

/// Read-time query surface over generated sheets.
///
/// Names and prefixes are accepted with or without the leading `$`. Missing sheets
/// simply contribute nothing; an empty reader answers every query with `None`.
#[derive(Debug)]
pub struct RuntimeTokens {
    resolver: Resolver<NameTable>,
}

impl RuntimeTokens {
    /// Build from sheets, recording diagnostics without logging them.
    pub fn from_sheets<I, S>(sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_policy(sheets, ReferencePolicy::Ignore)
    }

    pub fn with_policy<I, S>(sheets: I, policy: ReferencePolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = NameTable::from_sheets(sheets);
        tracing::debug!(tokens = table.len(), "runtime token table loaded");
        Self {
            resolver: Resolver::new(table, policy),
        }
    }

    pub fn empty() -> Self {
        Self::from_sheets(std::iter::empty::<&str>())
    }

    pub fn len(&self) -> usize {
        self.resolver.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolver.table().lookup(normalize_name(name)).is_some()
    }

    /// Resolve a declared name for a target. `None` when the name is not declared.
    pub fn resolve(&self, name: &str, target: Target) -> Option<String> {
        let entry = self.resolver.table().lookup(normalize_name(name))?;
        match self.resolver.resolve(entry, target) {
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }

    /// Fully dereferenced value with outer quotes stripped.
    pub fn resolve_token_value(&self, name: &str) -> Option<String> {
        self.resolve(name, Target::Concrete)
    }

    /// Declared text, unresolved.
    pub fn get_raw_token_value(&self, name: &str) -> Option<&str> {
        let table = self.resolver.table();
        table
            .lookup(normalize_name(name))
            .map(|entry| table.raw_text(entry))
    }

    pub fn get_token_value_or(&self, name: &str, fallback: &str) -> String {
        self.resolve_token_value(name)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Tokens whose name starts with `prefix`, in natural (numeric-aware) order.
    pub fn get_tokens_by_prefix(&self, prefix: &str) -> Vec<TokenRecord> {
        let prefix = normalize_name(prefix);
        let table = self.resolver.table();
        let mut records: Vec<TokenRecord> = (0..table.len())
            .filter(|entry| table.entry_key(*entry).starts_with(prefix))
            .map(|entry| self.record(entry))
            .collect();
        records.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        records
    }

    /// Every token, sorted by name.
    pub fn all_tokens(&self) -> Vec<TokenRecord> {
        let mut records: Vec<TokenRecord> = (0..self.len()).map(|entry| self.record(entry)).collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.resolver.diagnostics()
    }

    pub(crate) fn note(&self, diag: Diagnostic) {
        self.resolver.record(diag);
    }

    fn record(&self, entry: usize) -> TokenRecord {
        let table = self.resolver.table();
        let raw = table.raw_text(entry).to_string();
        let value = match self.resolver.resolve(entry, Target::Concrete) {
            Value::String(text) => text,
            _ => raw.clone(),
        };
        TokenRecord {
            name: format!("${}", table.entry_key(entry)),
            raw,
            value,
        }
    }
}

impl Default for RuntimeTokens {
    fn default() -> Self {
        Self::empty()
    }
}

/// Compare strings treating digit runs as numbers: `spacing-2` < `spacing-10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut left, mut right) = (a, b);
    loop {
        match (left.chars().next(), right.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (run_a, rest_a) = split_digits(left);
                let (run_b, rest_b) = split_digits(right);
                let ord = compare_digit_runs(run_a, run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
                left = rest_a;
                right = rest_b;
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                left = &left[x.len_utf8()..];
                right = &right[y.len_utf8()..];
            }
        }
    }
}

fn split_digits(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(end)
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        .then_with(|| a.len().cmp(&b.len()))
}
