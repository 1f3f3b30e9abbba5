//! Composite value formatter
//!
//! Raw values are classified once at flatten time into a [`ShapeKind`]. A resolved
//! value is turned into a typed [`ValueShape`] from that kind and rendered from it;
//! only entries whose raw form was a shadow or a bare reference are probed again.
//!
//! ```text
//! Value ──classify──► ValueShape ──render(dialect)──► declaration text
//!                      ├─ Text / Number / Bool / Null   (passthrough)
//!                      ├─ Shadow(layers)                 (box-shadow syntax)
//!                      └─ Structured                     (JSON, quoted for SCSS)
//! ```

pub mod motion;
pub mod number;
pub mod shadow;

pub use motion::{format_motion_value, MotionCurve};
pub use number::{float_text, number_text};
pub use shadow::{ShadowKind, ShadowLayer};

use serde_json::{Number, Value};
use tessera_core::Dialect;

/// Typed view of a resolved value, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueShape<'a> {
    Text(&'a str),
    Number(&'a Number),
    Bool(bool),
    Null,
    Shadow(Vec<ShadowLayer<'a>>),
    Structured(&'a Value),
}

impl<'a> ValueShape<'a> {
    /// Dispatch order: string, number/boolean, null, shadow, structural.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) => ValueShape::Text(s),
            Value::Number(n) => ValueShape::Number(n),
            Value::Bool(b) => ValueShape::Bool(*b),
            Value::Null => ValueShape::Null,
            composite => match shadow::parse_layers(composite) {
                Some(layers) => ValueShape::Shadow(layers),
                None => ValueShape::Structured(composite),
            },
        }
    }

    /// Classify a resolved value using the kind recorded for its raw value.
    ///
    /// Resolution preserves structure, so composites that were not shadows before
    /// resolution are rendered structurally without probing for layers.
    pub fn for_kind(value: &'a Value, kind: ShapeKind) -> Self {
        match (kind, value) {
            (ShapeKind::Composite | ShapeKind::MotionCurve, Value::Array(_) | Value::Object(_)) => {
                ValueShape::Structured(value)
            }
            _ => Self::classify(value),
        }
    }

    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            ValueShape::Text(s) => (*s).to_string(),
            ValueShape::Number(n) => number_text(n),
            ValueShape::Bool(b) => b.to_string(),
            ValueShape::Null => "null".to_string(),
            ValueShape::Shadow(layers) => shadow::layers_to_css(layers),
            ValueShape::Structured(value) => structural_text(value, dialect),
        }
    }
}

/// Coarse classification of a raw token value, recorded on each flat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Plain literal.
    Scalar,
    /// A string that is exactly one `{...}` reference.
    Reference,
    /// One or more shadow layers.
    Shadow,
    /// Four-point bezier array.
    MotionCurve,
    /// Any other object or array.
    Composite,
}

impl ShapeKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(s) if crate::resolver::is_exact_brace_reference(s) => ShapeKind::Reference,
            Value::Array(_) | Value::Object(_) => {
                if shadow::parse_layers(value).is_some() {
                    ShapeKind::Shadow
                } else if MotionCurve::from_value(value).is_some() {
                    ShapeKind::MotionCurve
                } else {
                    ShapeKind::Composite
                }
            }
            _ => ShapeKind::Scalar,
        }
    }
}

/// Render any value for a declaration.
pub fn stringify(value: &Value, dialect: Dialect) -> String {
    ValueShape::classify(value).render(dialect)
}

/// Render a flat entry's resolved value from its flatten-time kind.
pub fn stringify_as(value: &Value, kind: ShapeKind, dialect: Dialect) -> String {
    ValueShape::for_kind(value, kind).render(dialect)
}

/// JSON text; SCSS wraps it in single quotes with inner quotes escaped.
fn structural_text(value: &Value, dialect: Dialect) -> String {
    let json = serde_json::to_string(value).unwrap_or_default();
    match dialect {
        Dialect::Scss => format!("'{}'", json.replace('\'', "\\'")),
        Dialect::Css => json,
    }
}
