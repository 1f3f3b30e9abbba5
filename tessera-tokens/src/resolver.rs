//! Reference resolver
//!
//! One resolution algorithm shared by the build-time token table (hierarchical
//! `{dotted.path}` references over flat entries) and the read-time sheet table
//! (`$name` references over generated declarations). A [`ReferenceTable`] supplies
//! the reference syntax and lookups; [`Resolver`] owns the per-entry, per-target
//! memoization and the cycle guard.
//!
//! # Algorithm
//!
//! ```text
//! resolve(entry, target)
//!   ├─ cached?            → cached value
//!   └─ push, walk raw value, pop, cache
//!        ├─ string == one reference  → Symbolic: handle, Concrete: referent (typed)
//!        ├─ string with references   → textual substitution, misses left verbatim
//!        ├─ array / object           → element-wise / field-wise
//!        └─ other scalars            → unchanged
//! ```
//!
//! Entries on a reference cycle are found up front (strongly connected components
//! of the reference graph). A concrete reference from one member of a cycle to
//! another member of the same cycle records a diagnostic and substitutes the
//! referent's *partial* value: its raw value with every reference that leaves the
//! cycle resolved and every reference back into the cycle kept verbatim.
//!
//! ```text
//! A = {B}   B = {C} {X}   C = {A}   X = 5
//! partial(B) = "{C} 5"  →  A = "{C} 5", B = "{A} 5", C = "{B}"
//! ```
//!
//! A partial walk only descends into entries outside its cycle, so the walk always
//! terminates and every result is independent of the order in which entries are
//! resolved. That makes all results safe to cache.

use crate::format::{number_text, stringify};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde_json::Value;
use std::sync::Mutex;
use tessera_core::{Diagnostic, DiagnosticKind, Dialect, ReferencePolicy, Target};

/// `{dotted.path}` reference; group 1 is the key.
pub static BRACE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("static pattern"));

/// True when `text` (trimmed) is exactly one `{...}` reference.
pub fn is_exact_brace_reference(text: &str) -> bool {
    exact_reference(&BRACE_REFERENCE, text.trim()).is_some()
}

fn exact_reference<'t>(pattern: &Regex, trimmed: &'t str) -> Option<&'t str> {
    let caps = pattern.captures(trimmed)?;
    let whole = caps.get(0)?;
    if whole.start() == 0 && whole.end() == trimmed.len() {
        caps.get(1).map(|key| key.as_str())
    } else {
        None
    }
}

// ============================================================================
// TABLE ABSTRACTION
// ============================================================================

/// Backing table for a [`Resolver`]. Entries are addressed by dense index.
pub trait ReferenceTable {
    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pattern matching one reference; capture group 1 is the lookup key.
    fn reference_pattern(&self) -> &Regex;

    /// Entry owning a reference key, if any.
    fn lookup(&self, key: &str) -> Option<usize>;

    /// Stable key of an entry, used in diagnostics.
    fn entry_key(&self, entry: usize) -> &str;

    /// The entry's unresolved value.
    fn raw_value(&self, entry: usize) -> &Value;

    /// Symbolic stand-in for a reference to `entry`.
    fn handle(&self, entry: usize) -> String;

    /// Post-process a resolved (or cycle-fallback) value before it is cached,
    /// returned, or substituted into another value.
    fn finish(&self, value: Value) -> Value {
        value
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Memoizing resolver over a [`ReferenceTable`].
///
/// Caches are write-once per (entry, target). Concurrent callers racing on the same
/// slot keep whichever value landed first; both computed the same value.
#[derive(Debug)]
pub struct Resolver<T> {
    table: T,
    slots: Vec<[OnceCell<Value>; 2]>,
    /// Concrete value with references back into the entry's own cycle left as written.
    partials: Vec<OnceCell<Value>>,
    /// Cycle id per entry; `None` for entries on no cycle.
    cycles: Vec<Option<usize>>,
    policy: ReferencePolicy,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

/// Entries currently being walked, innermost last.
#[derive(Default)]
struct Walk {
    stack: Vec<usize>,
}

/// Which references a walk follows.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// Every resolvable reference.
    Full,
    /// References into this cycle stay verbatim.
    Cycle(usize),
}

impl<T: ReferenceTable> Resolver<T> {
    pub fn new(table: T, policy: ReferencePolicy) -> Self {
        let slots = (0..table.len()).map(|_| Default::default()).collect();
        let partials = (0..table.len()).map(|_| OnceCell::new()).collect();
        let cycles = cycle_ids(&table);
        Self {
            table,
            slots,
            partials,
            cycles,
            policy,
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    /// Resolve an entry for a target. Never fails; degraded cases are recorded
    /// as diagnostics.
    pub fn resolve(&self, entry: usize, target: Target) -> Value {
        if entry >= self.table.len() {
            return Value::Null;
        }
        let mut walk = Walk::default();
        self.resolve_entry(entry, target, &mut walk)
    }

    /// Diagnostics recorded so far, in first-seen order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.diagnostics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn resolve_entry(&self, entry: usize, target: Target, walk: &mut Walk) -> Value {
        let slot = &self.slots[entry][target.slot()];
        if let Some(cached) = slot.get() {
            return cached.clone();
        }

        let resolved = self.walk_entry(entry, target, Scope::Full, walk);
        match slot.set(resolved.clone()) {
            Ok(()) => resolved,
            Err(_) => slot.get().cloned().unwrap_or(resolved),
        }
    }

    fn walk_entry(&self, entry: usize, target: Target, scope: Scope, walk: &mut Walk) -> Value {
        walk.stack.push(entry);
        let resolved = self.walk_value(self.table.raw_value(entry), target, scope, walk);
        walk.stack.pop();
        self.table.finish(resolved)
    }

    /// Concrete value for a reference from the current entry to `entry`, or `None`
    /// when the reference must stay as written.
    fn follow(&self, entry: usize, scope: Scope, walk: &mut Walk) -> Option<Value> {
        if let Scope::Cycle(cycle) = scope {
            if self.cycles[entry] == Some(cycle) {
                return None;
            }
        }
        let current = walk.stack.last().copied();
        let same_cycle = current
            .and_then(|from| self.cycles[from])
            .filter(|cycle| self.cycles[entry] == Some(*cycle));
        match same_cycle {
            Some(cycle) => {
                self.record_cycle(entry, walk);
                Some(self.partial(entry, cycle, walk))
            }
            None => Some(self.resolve_entry(entry, Target::Concrete, walk)),
        }
    }

    fn partial(&self, entry: usize, cycle: usize, walk: &mut Walk) -> Value {
        let slot = &self.partials[entry];
        if let Some(cached) = slot.get() {
            return cached.clone();
        }
        let value = self.walk_entry(entry, Target::Concrete, Scope::Cycle(cycle), walk);
        match slot.set(value.clone()) {
            Ok(()) => value,
            Err(_) => slot.get().cloned().unwrap_or(value),
        }
    }

    fn walk_value(&self, value: &Value, target: Target, scope: Scope, walk: &mut Walk) -> Value {
        match value {
            Value::String(text) => self.substitute(text, target, scope, walk),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.walk_value(item, target, scope, walk))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.walk_value(item, target, scope, walk)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn substitute(&self, text: &str, target: Target, scope: Scope, walk: &mut Walk) -> Value {
        let pattern = self.table.reference_pattern();

        if let Some(key) = exact_reference(pattern, text.trim()) {
            let key = key.trim();
            return match self.table.lookup(key) {
                Some(entry) => match target {
                    Target::Symbolic => Value::String(self.table.handle(entry)),
                    Target::Concrete => self
                        .follow(entry, scope, walk)
                        .unwrap_or_else(|| Value::String(text.to_string())),
                },
                None => {
                    self.record_unresolved(text, walk);
                    Value::String(text.to_string())
                }
            };
        }

        if !pattern.is_match(text) {
            return Value::String(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            last = whole.end();

            let key = caps.get(1).map(|k| k.as_str().trim()).unwrap_or_default();
            match self.table.lookup(key) {
                Some(entry) => match target {
                    Target::Symbolic => out.push_str(&self.table.handle(entry)),
                    Target::Concrete => match self.follow(entry, scope, walk) {
                        Some(resolved) => out.push_str(&inline_text(&resolved)),
                        None => out.push_str(whole.as_str()),
                    },
                },
                None => {
                    self.record_unresolved(whole.as_str(), walk);
                    out.push_str(whole.as_str());
                }
            }
        }
        out.push_str(&text[last..]);
        Value::String(out)
    }

    fn current_key(&self, walk: &Walk) -> String {
        walk.stack
            .last()
            .map(|entry| self.table.entry_key(*entry).to_string())
            .unwrap_or_default()
    }

    fn record_unresolved(&self, reference: &str, walk: &Walk) {
        let diag = Diagnostic::new(
            DiagnosticKind::UnresolvedReference,
            self.current_key(walk),
            reference.trim(),
        );
        self.record(diag);
    }

    fn record_cycle(&self, entry: usize, walk: &Walk) {
        let from = self.current_key(walk);
        let diag = Diagnostic::new(
            DiagnosticKind::CircularReference,
            from.clone(),
            format!("{} -> {}", from, self.table.entry_key(entry)),
        );
        self.record(diag);
    }

    pub(crate) fn record(&self, diag: Diagnostic) {
        let mut guard = match self.diagnostics.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.contains(&diag) {
            return;
        }
        if self.policy == ReferencePolicy::Warn {
            tracing::warn!(
                kind = %diag.kind,
                token = %diag.token,
                detail = %diag.detail,
                "token reference degraded"
            );
        }
        guard.push(diag);
    }
}

// ============================================================================
// CYCLE DETECTION
// ============================================================================

/// Entries referenced from an entry's raw value, unresolvable keys dropped.
fn references_of<T: ReferenceTable>(table: &T, entry: usize) -> Vec<usize> {
    let mut found = Vec::new();
    collect_references(table, table.raw_value(entry), &mut found);
    found.sort_unstable();
    found.dedup();
    found
}

fn collect_references<T: ReferenceTable>(table: &T, value: &Value, found: &mut Vec<usize>) {
    match value {
        Value::String(text) => {
            for caps in table.reference_pattern().captures_iter(text) {
                if let Some(entry) = caps.get(1).and_then(|key| table.lookup(key.as_str().trim())) {
                    found.push(entry);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_references(table, item, found)),
        Value::Object(map) => map.values().for_each(|item| collect_references(table, item, found)),
        _ => {}
    }
}

/// Label every entry that sits on a reference cycle with the id of its strongly
/// connected component (Tarjan, iterative). Self-references count as cycles.
fn cycle_ids<T: ReferenceTable>(table: &T) -> Vec<Option<usize>> {
    const UNVISITED: usize = usize::MAX;

    let count = table.len();
    let edges: Vec<Vec<usize>> = (0..count).map(|entry| references_of(table, entry)).collect();
    let mut index = vec![UNVISITED; count];
    let mut low = vec![0; count];
    let mut on_stack = vec![false; count];
    let mut stack = Vec::new();
    let mut ids = vec![None; count];
    let mut next_index = 0;
    let mut next_id = 0;

    for root in 0..count {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = next_index;
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            if let Some(&succ) = edges[node].get(frame.1) {
                frame.1 += 1;
                if index[succ] == UNVISITED {
                    index[succ] = next_index;
                    low[succ] = next_index;
                    next_index += 1;
                    stack.push(succ);
                    on_stack[succ] = true;
                    frames.push((succ, 0));
                } else if on_stack[succ] {
                    low[node] = low[node].min(index[succ]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                low[parent] = low[parent].min(low[node]);
            }
            if low[node] != index[node] {
                continue;
            }

            let mut members = Vec::new();
            while let Some(member) = stack.pop() {
                on_stack[member] = false;
                members.push(member);
                if member == node {
                    break;
                }
            }
            if members.len() > 1 || edges[node].contains(&node) {
                for member in members {
                    ids[member] = Some(next_id);
                }
                next_id += 1;
            }
        }
    }
    ids
}

/// Text spliced into a string around other content: strings and numbers as-is,
/// everything else through the CSS formatter.
fn inline_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        other => stringify(other, Dialect::Css),
    }
}
