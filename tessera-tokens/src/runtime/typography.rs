//! Typography token to CSS property mapping.

use super::reader::RuntimeTokens;
use crate::format::number_text;
use serde::Serialize;
use serde_json::{Map, Value};
use tessera_core::{Diagnostic, DiagnosticKind};

/// Known families and their fallback stacks.
const FONT_FALLBACKS: [(&str, &str); 2] = [
    ("Questa", "'Questa', 'Times New Roman', Times, serif"),
    ("Lexend", "'Lexend', 'Arial', 'Helvetica', sans-serif"),
];

/// Checked in order; first substring match wins.
const WEIGHT_KEYWORDS: [(&str, &str); 10] = [
    ("black", "900"),
    ("extra bold", "800"),
    ("extrabold", "800"),
    ("bold", "700"),
    ("semi bold", "600"),
    ("semibold", "600"),
    ("medium", "500"),
    ("regular", "400"),
    ("light", "300"),
    ("thin", "100"),
];

/// CSS properties derived from a typography token.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypographyStyle {
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<String>,
    pub line_height: Option<String>,
    pub text_decoration: Option<String>,
    pub letter_spacing: Option<String>,
    pub text_transform: Option<String>,
    /// The parsed token object.
    pub raw: Map<String, Value>,
}

impl TypographyStyle {
    /// Resolve `name` and map its JSON object to CSS properties.
    ///
    /// An undeclared or empty token yields an empty style. A value that is not a JSON
    /// object is logged, recorded as a diagnostic, and also yields an empty style.
    pub fn from_token(tokens: &RuntimeTokens, name: &str) -> Self {
        let Some(resolved) = tokens.resolve_token_value(name).filter(|v| !v.is_empty()) else {
            return Self::default();
        };

        // SCSS sheets escape single quotes inside quoted JSON.
        let text = resolved.replace("\\'", "'");
        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(parsed) => Self::from_object(parsed),
            Err(err) => {
                tracing::warn!(token = %name, error = %err, "failed to parse typography token");
                tokens.note(Diagnostic::new(
                    DiagnosticKind::MalformedComposite,
                    name.trim_start_matches('$'),
                    resolved,
                ));
                Self::default()
            }
        }
    }

    /// Map an already-parsed typography object.
    pub fn from_object(raw: Map<String, Value>) -> Self {
        let field = |key: &str| raw.get(key).and_then(field_text);

        let font_family = field("fontFamily").map(|family| {
            FONT_FALLBACKS
                .iter()
                .find(|(known, _)| *known == family)
                .map(|(_, stack)| stack.to_string())
                .unwrap_or_else(|| format!("\"{}\"", family))
        });

        let (font_weight, font_style) = match field("fontWeight") {
            Some(weight) => font_weight(&weight),
            None => (None, None),
        };

        let letter_spacing = field("letterSpacing").map(|spacing| letter_spacing(&spacing));
        let text_transform = field("textCase")
            .or_else(|| field("textTransform"))
            .map(|case| text_transform(&case));
        let font_size = field("fontSize");
        let line_height = field("lineHeight");
        let text_decoration = field("textDecoration");

        Self {
            font_family,
            font_weight,
            font_style,
            font_size,
            line_height,
            text_decoration,
            letter_spacing,
            text_transform,
            raw,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations().is_empty()
    }

    /// `(property, value)` pairs in a stable order.
    pub fn declarations(&self) -> Vec<(&'static str, &str)> {
        [
            ("font-family", &self.font_family),
            ("font-weight", &self.font_weight),
            ("font-style", &self.font_style),
            ("font-size", &self.font_size),
            ("line-height", &self.line_height),
            ("text-decoration", &self.text_decoration),
            ("letter-spacing", &self.letter_spacing),
            ("text-transform", &self.text_transform),
        ]
        .into_iter()
        .filter_map(|(property, value)| value.as_deref().map(|v| (property, v)))
        .collect()
    }
}

/// Non-empty string or number text.
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

fn font_weight(value: &str) -> (Option<String>, Option<String>) {
    let normalized = value.to_lowercase();
    let weight = if value.chars().all(|c| c.is_ascii_digit()) {
        Some(value.to_string())
    } else {
        WEIGHT_KEYWORDS
            .iter()
            .find(|(keyword, _)| normalized.contains(keyword))
            .map(|(_, weight)| weight.to_string())
    };
    let style = normalized.contains("italic").then(|| "italic".to_string());
    (weight, style)
}

/// `N%` becomes `N/100 em`; anything else passes through.
fn letter_spacing(value: &str) -> String {
    value
        .strip_suffix('%')
        .and_then(|number| number.trim().parse::<f64>().ok())
        .filter(|number| number.is_finite())
        .map(|number| format!("{}em", crate::format::float_text(number / 100.0)))
        .unwrap_or_else(|| value.to_string())
}

fn text_transform(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "uppercase" => "uppercase".to_string(),
        "lowercase" => "lowercase".to_string(),
        "capitalize" => "capitalize".to_string(),
        "none" | "normal" => "none".to_string(),
        _ => value.to_string(),
    }
}
