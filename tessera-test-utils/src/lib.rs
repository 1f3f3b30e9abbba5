//! Tessera Test Utilities
//!
//! Shared test infrastructure for the Tessera workspace:
//! - Proptest generators for token paths, shadow layers and whole documents
//! - Canned documents and generated sheets
//! - Assertions for resolved output

pub use tessera_core::{
    ConfigError, Diagnostic, DiagnosticKind, Dialect, DocumentError, PipelineConfig,
    ReferencePolicy, Target, TesseraError, TesseraResult,
};
pub use tessera_tokens::resolver::BRACE_REFERENCE;
pub use tessera_tokens::{RuntimeTokens, TokenDocument, TokenEngine};

use serde_json::{json, Map, Value};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for token documents.

    use super::*;
    use proptest::prelude::*;

    /// A path segment as design tools write them: mixed case, spaces, punctuation.
    pub fn arb_segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 _/.-]{0,11}"
    }

    /// A token path, group first.
    pub fn arb_path() -> impl Strategy<Value = Vec<String>> {
        (
            prop_oneof![
                Just("Primitives".to_string()),
                Just("Tokens".to_string()),
                Just("Responsive/Desktop".to_string()),
                Just("Responsive/Mobile".to_string()),
                Just("Motion".to_string()),
                arb_segment(),
            ],
            prop::collection::vec(arb_segment(), 0..5),
        )
            .prop_map(|(group, rest)| std::iter::once(group).chain(rest).collect())
    }

    /// A numeric field the way exports write it: number, bare string or unit string.
    pub fn arb_length() -> impl Strategy<Value = Value> {
        prop_oneof![
            (-64i64..64).prop_map(Value::from),
            (0i64..64).prop_map(|n| Value::from(n.to_string())),
            (0i64..64).prop_map(|n| Value::from(format!("{}rem", n))),
        ]
    }

    /// One shadow layer object.
    pub fn arb_shadow_layer() -> impl Strategy<Value = Value> {
        (
            prop_oneof![Just("dropShadow"), Just("innerShadow")],
            arb_length(),
            arb_length(),
            arb_length(),
            arb_length(),
            prop_oneof![Just("#000"), Just("rgba(0, 0, 0, 0.2)"), Just("transparent")],
        )
            .prop_map(|(kind, x, y, blur, spread, color)| {
                json!({"type": kind, "x": x, "y": y, "blur": blur, "spread": spread, "color": color})
            })
    }

    /// A literal token value.
    pub fn arb_literal() -> impl Strategy<Value = Value> {
        prop_oneof![
            (0i64..100).prop_map(Value::from),
            "#[0-9a-f]{6}".prop_map(Value::from),
            (0i64..48).prop_map(|n| Value::from(format!("{}px", n))),
            prop::collection::vec(arb_shadow_layer(), 1..3).prop_map(Value::from),
        ]
    }

    /// An acyclic `Tokens` document: token `tN` is a literal or references
    /// earlier tokens only, exactly or embedded in text.
    pub fn arb_token_tree() -> impl Strategy<Value = Value> {
        prop::collection::vec((arb_literal(), any::<prop::sample::Index>(), 0u8..3), 1..24).prop_map(
            |specs| {
                let mut group = Map::new();
                for (i, (literal, pick, mode)) in specs.into_iter().enumerate() {
                    let value = if i == 0 || mode == 0 {
                        literal
                    } else {
                        let target = pick.index(i);
                        match mode {
                            1 => Value::from(format!("{{t{}}}", target)),
                            _ => Value::from(format!("1px solid {{t{}}}", target)),
                        }
                    };
                    group.insert(format!("t{}", i), json!({ "$value": value }));
                }
                json!({ "Tokens": group })
            },
        )
    }

    /// A generated SCSS sheet with `$name` references to earlier declarations.
    pub fn arb_sheet() -> impl Strategy<Value = String> {
        prop::collection::vec(
            (any::<prop::sample::Index>(), any::<bool>(), "[a-z0-9#]{1,8}"),
            1..24,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (pick, reference, literal))| {
                    let value = if i > 0 && reference {
                        format!("$token-{}", pick.index(i))
                    } else {
                        literal
                    };
                    format!("$token-{}: {};\n", i, value)
                })
                .collect()
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Canned documents and sheets.

    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    /// A small export covering every group rule, aliases, shadows and typography.
    pub const SAMPLE_DOCUMENT: &str = r##"{
  "Primitives": {
    "colors": {
      "brand": {
        "teal-500": {"$value": "#0f766e", "$type": "color", "$description": "Primary brand teal"},
        "teal-700": {"$value": "#115e59", "$type": "color"}
      },
      "neutral": {
        "black": {"$value": "#000000", "$type": "color"},
        "white": {"$value": "#ffffff", "$type": "color"}
      }
    },
    "spacing": {
      "2": {"$value": 8, "$type": "spacing"},
      "10": {"$value": 40, "$type": "spacing"},
      "1": {"$value": 4, "$type": "spacing"}
    }
  },
  "Tokens": {
    "color": {
      "accent": {"$value": "{colors.brand.teal-500}", "$type": "color", "$description": "Accent for links"},
      "text": {
        "primary": {"$value": "{neutral.black}", "$type": "color"},
        "inverse": {"$value": "{neutral.white}", "$type": "color"}
      },
      "border": {"focus": {"$value": "{accent}", "$type": "color"}}
    },
    "border": {
      "focus": {"$value": "{spacing.1}px solid {color.border.focus}", "$type": "border"}
    }
  },
  "Elevation": {
    "raised": {
      "$value": [
        {"type": "dropShadow", "x": 0, "y": 1, "blur": 2, "spread": 0, "color": "rgba(0, 0, 0, 0.2)"},
        {"type": "innerShadow", "x": 0, "y": "2", "blur": "4px", "spread": 0, "color": "{neutral.black}"}
      ],
      "$type": "boxShadow"
    }
  },
  "Responsive/Desktop": {
    "typescale": {
      "body": {"$value": {"fontFamily": "Lexend", "fontWeight": "Regular", "fontSize": "16px", "lineHeight": "150%"}, "$type": "typography"},
      "heading": {"$value": "{typescale.body}", "$type": "typography"}
    }
  },
  "Responsive/Mobile": {
    "typescale": {
      "body": {"$value": {"fontFamily": "Lexend", "fontWeight": "Regular", "fontSize": "14px", "lineHeight": "150%"}, "$type": "typography"},
      "heading": {"$value": "{typescale.body}", "$type": "typography"}
    }
  },
  "Focus": {
    "ring": {
      "$value": {"type": "dropShadow", "x": 0, "y": 0, "blur": 0, "spread": 3, "color": "{color.accent}"},
      "$type": "boxShadow"
    }
  },
  "$themes": [],
  "$metadata": {
    "tokenSetOrder": ["Primitives", "Tokens", "Elevation", "Responsive/Desktop", "Responsive/Mobile", "Focus"]
  }
}"##;

    /// Standalone motion export.
    pub const MOTION_DOCUMENT: &str = r#"{
  "Motion": {
    "easings": {"standard": [0.4, 0, 0.2, 1], "emphasized": [0.2, 0, 0, 1]},
    "durations": {"fast": 100, "base": 200},
    "delays": {"short": 50}
  }
}"#;

    /// Two sheets as the generator writes them, with a duplicate name in the second.
    pub const TOKENS_SHEET: &str = "// Do not edit directly, this file was auto-generated.\n\
// Group: Tokens\n\n\
$color-accent: $brand-teal-500;\n\
$color-text-primary: $neutral-black;\n\
$border-focus: 4px solid $color-accent;\n\
$type-body: '{\"fontFamily\":\"Lexend\",\"fontWeight\":\"Medium Italic\",\"fontSize\":\"16px\",\"letterSpacing\":\"5%\",\"textCase\":\"none\"}';\n";

    pub const PRIMITIVES_SHEET: &str = "// Group: Primitives\n\n\
$brand-teal-500: #0f766e;\n\
$neutral-black: #000000;\n\
$spacing-1: 4;\n\
$spacing-2: 8;\n\
$spacing-10: 40;\n\
$color-accent: #ff00ff;\n";

    pub fn sample_document() -> TokenDocument {
        TokenDocument::parse(SAMPLE_DOCUMENT).unwrap_or_else(|err| panic!("fixture: {}", err))
    }

    pub fn sample_sheets() -> [&'static str; 2] {
        [TOKENS_SHEET, PRIMITIVES_SHEET]
    }

    /// Fixed header time for reproducible output.
    pub fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .unwrap_or_default()
    }

    pub fn document_value(text: &str) -> Value {
        serde_json::from_str(text).unwrap_or_else(|err| panic!("fixture: {}", err))
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertion helpers for resolved output.

    use super::*;

    /// Assert that a TesseraResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &TesseraResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a TesseraResult is a Document error.
    #[track_caller]
    pub fn assert_document_error<T: std::fmt::Debug>(result: &TesseraResult<T>) {
        match result {
            Err(TesseraError::Document(_)) => {}
            other => panic!("Expected Document error, got: {:?}", other),
        }
    }

    /// Assert that a TesseraResult is a Config error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &TesseraResult<T>) {
        match result {
            Err(TesseraError::Config(_)) => {}
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    /// Assert that no string inside a resolved value holds a `{...}` reference.
    #[track_caller]
    pub fn assert_no_brace_references(value: &Value) {
        match value {
            Value::String(text) => {
                assert!(
                    !BRACE_REFERENCE.is_match(text),
                    "Unresolved reference in {:?}",
                    text
                );
            }
            Value::Array(items) => items.iter().for_each(assert_no_brace_references),
            Value::Object(map) => map.values().for_each(assert_no_brace_references),
            _ => {}
        }
    }

    /// Assert that no diagnostic of `kind` was recorded.
    #[track_caller]
    pub fn assert_no_diagnostic(diagnostics: &[Diagnostic], kind: DiagnosticKind) {
        if let Some(diag) = diagnostics.iter().find(|d| d.kind == kind) {
            panic!("Unexpected diagnostic: {}", diag);
        }
    }
}
