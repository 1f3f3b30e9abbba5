//! Tessera Core - Shared Vocabulary
//!
//! Plain data types shared by every Tessera crate: output targets, style-sheet
//! dialects, non-fatal diagnostics, the error taxonomy and pipeline configuration.
//! This crate contains no resolution logic.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod error;

pub use config::*;
pub use error::*;

// ============================================================================
// OUTPUT TARGETS
// ============================================================================

/// Resolution target for a token value.
///
/// `Symbolic` keeps indirection: a reference becomes a handle naming the other
/// token. `Concrete` dereferences every reference down to a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Symbolic,
    Concrete,
}

impl Target {
    /// Both targets, in cache-slot order.
    pub const ALL: [Target; 2] = [Target::Symbolic, Target::Concrete];

    /// Index of this target's memoization slot.
    pub fn slot(self) -> usize {
        match self {
            Target::Symbolic => 0,
            Target::Concrete => 1,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Symbolic => write!(f, "symbolic"),
            Target::Concrete => write!(f, "concrete"),
        }
    }
}

/// Declaration syntax a formatted value is written into.
///
/// Structured fallbacks differ per dialect: SCSS wraps JSON in single quotes so the
/// declaration stays a valid string literal, CSS emits the JSON as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Scss,
    Css,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Scss => write!(f, "scss"),
            Dialect::Css => write!(f, "css"),
        }
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Kind of a non-fatal condition met while resolving or formatting a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Reference key not present in the lookup table; left verbatim.
    UnresolvedReference,
    /// Token reachable from itself; resolution fell back to the raw value.
    CircularReference,
    /// Composite value could not be parsed; an empty result was used.
    MalformedComposite,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved reference"),
            DiagnosticKind::CircularReference => write!(f, "circular reference"),
            DiagnosticKind::MalformedComposite => write!(f, "malformed composite"),
        }
    }
}

/// A non-fatal condition, local to one token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Key of the token being resolved when the condition was met.
    pub token: String,
    /// The offending reference or payload.
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, token: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.token, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_slots_are_distinct() {
        assert_eq!(Target::Symbolic.slot(), 0);
        assert_eq!(Target::Concrete.slot(), 1);
        assert_eq!(Target::ALL.len(), 2);
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(
            DiagnosticKind::UnresolvedReference,
            "Tokens.color.text",
            "{color.missing}",
        );
        let msg = diag.to_string();
        assert!(msg.contains("unresolved reference"));
        assert!(msg.contains("Tokens.color.text"));
        assert!(msg.contains("{color.missing}"));
    }

    #[test]
    fn test_target_serde_lowercase() {
        let json = serde_json::to_string(&Target::Concrete).unwrap();
        assert_eq!(json, "\"concrete\"");
        let back: Dialect = serde_json::from_str("\"scss\"").unwrap();
        assert_eq!(back, Dialect::Scss);
    }
}
