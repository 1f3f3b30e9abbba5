//! TESSERA TOKENS - Design Token Resolution Engine
//!
//! Turns a design-tool token export into flat SCSS/CSS declaration sheets, and reads
//! those sheets back for documentation tooling.
//!
//! Architecture:
//! ```text
//! Token Document (JSON)
//!     ↓
//! Document model (group order, reference qualification)
//!     ↓
//! Flattener + Sanitizer (leaf entries, generated names)
//!     ↓
//! Alias Index (path suffixes, first registration wins)
//!     ↓
//! Resolver (symbolic / concrete, memoized, cycle-guarded)
//!     ↓
//! Formatter (shadows, motion curves, structured JSON)
//!     ↓
//! Generator (per-group sheets + index)
//!
//! Generated sheets ──► Runtime reader (same resolver over `$name` declarations)
//! ```

pub mod alias;
pub mod document;
pub mod engine;
pub mod flatten;
pub mod format;
pub mod generator;
pub mod pipeline;
pub mod resolver;
pub mod runtime;
pub mod sanitize;

// Re-export key types for convenience
pub use alias::AliasIndex;
pub use document::{file_stem, TokenDocument};
pub use engine::{TokenEngine, TokenTable};
pub use flatten::{flatten, FlatEntry};
pub use format::{stringify, stringify_as, ShapeKind, ValueShape};
pub use generator::{GeneratedFile, Generator, GeneratorOptions, GeneratorOutput, GroupKind, GroupPlan};
pub use pipeline::{BuildReport, BuildSources, TokenPipeline};
pub use resolver::{ReferenceTable, Resolver};
pub use runtime::{RuntimeTokens, TokenDescriptions, TokenRecord, TypographyStyle};
pub use sanitize::{build_name, sanitize, sanitize_segment};
pub use tessera_core::{Diagnostic, DiagnosticKind, Dialect, PipelineConfig, ReferencePolicy, Target};
