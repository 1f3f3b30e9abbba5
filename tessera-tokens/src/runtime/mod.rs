//! Read-time access to generated tokens
//!
//! Documentation and preview tooling read the generated SCSS sheets back instead of
//! the source document. The reader shares the build-time resolver, keyed by plain
//! `$name` instead of dotted paths.

pub mod descriptions;
pub mod reader;
pub mod typography;

pub use descriptions::TokenDescriptions;
pub use reader::{natural_cmp, NameTable, RuntimeTokens, TokenRecord};
pub use typography::TypographyStyle;
