//! Shadow layers: Tokens Studio shadow objects to CSS `box-shadow` syntax.

use super::number::{number_text, numeric_value};
use serde_json::Value;

const OFFSET_FIELDS: [&str; 4] = ["x", "y", "blur", "spread"];

/// Shadow flavour, from the layer's `type` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowKind {
    Drop,
    Inner,
}

/// One typed shadow layer. Fields keep the authored JSON so unit-suffixed
/// strings pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowLayer<'a> {
    pub kind: ShadowKind,
    pub x: &'a Value,
    pub y: &'a Value,
    pub blur: &'a Value,
    pub spread: &'a Value,
    pub color: &'a Value,
}

impl<'a> ShadowLayer<'a> {
    /// Classify an object as a shadow layer.
    ///
    /// Requires `type` of `dropShadow`/`innerShadow` plus `color`, `x`, `y`, `blur`
    /// and `spread` keys.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let object = value.as_object()?;
        let kind = match object.get("type").and_then(Value::as_str)? {
            "dropShadow" => ShadowKind::Drop,
            "innerShadow" => ShadowKind::Inner,
            _ => return None,
        };
        if !object.contains_key("color") || !OFFSET_FIELDS.iter().all(|f| object.contains_key(*f)) {
            return None;
        }
        Some(Self {
            kind,
            x: &object["x"],
            y: &object["y"],
            blur: &object["blur"],
            spread: &object["spread"],
            color: &object["color"],
        })
    }

    /// `[inset ]<x> <y> <blur> <spread> <color>`
    pub fn to_css(&self) -> String {
        let inset = match self.kind {
            ShadowKind::Inner => "inset ",
            ShadowKind::Drop => "",
        };
        let color = if is_blank(self.color) {
            "transparent".to_string()
        } else {
            scalar_text(self.color)
        };
        format!(
            "{}{} {} {} {} {}",
            inset,
            length_text(self.x),
            length_text(self.y),
            length_text(self.blur),
            length_text(self.spread),
            color
        )
        .trim()
        .to_string()
    }
}

/// Parse a single layer or a non-empty array of layers. Any non-layer member
/// disqualifies the whole value.
pub fn parse_layers(value: &Value) -> Option<Vec<ShadowLayer<'_>>> {
    match value {
        Value::Object(_) => ShadowLayer::from_value(value).map(|layer| vec![layer]),
        Value::Array(items) if !items.is_empty() => {
            items.iter().map(ShadowLayer::from_value).collect()
        }
        _ => None,
    }
}

/// Comma-joined layers, authored order kept.
pub fn layers_to_css(layers: &[ShadowLayer<'_>]) -> String {
    layers
        .iter()
        .map(ShadowLayer::to_css)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Absent-ish values (null, false, empty string, zero) count as 0.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn length_text(value: &Value) -> String {
    if is_blank(value) {
        return "0px".to_string();
    }
    match value {
        Value::Number(n) => format!("{}px", number_text(n)),
        Value::String(s) if numeric_value(value).is_some() => format!("{}px", s.trim()),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drop_shadow() {
        let value = json!({"type": "dropShadow", "x": 0, "y": 4, "blur": 8, "spread": 0, "color": "#000"});
        let layers = parse_layers(&value).unwrap();
        assert_eq!(layers_to_css(&layers), "0px 4px 8px 0px #000");
    }

    #[test]
    fn test_inner_shadow_is_inset() {
        let value = json!({"type": "innerShadow", "x": 1, "y": 1, "blur": 2, "spread": 0, "color": "red"});
        let layers = parse_layers(&value).unwrap();
        assert_eq!(layers_to_css(&layers), "inset 1px 1px 2px 0px red");
    }

    #[test]
    fn test_unit_suffixed_fields_pass_through() {
        let value = json!({"type": "dropShadow", "x": "0.5rem", "y": "4", "blur": "8px", "spread": null, "color": ""});
        let layers = parse_layers(&value).unwrap();
        assert_eq!(layers_to_css(&layers), "0.5rem 4px 8px 0px transparent");
    }

    #[test]
    fn test_multiple_layers_keep_order() {
        let value = json!([
            {"type": "dropShadow", "x": 0, "y": 1, "blur": 2, "spread": 0, "color": "#111"},
            {"type": "innerShadow", "x": 0, "y": 0, "blur": 0, "spread": 2, "color": "#222"}
        ]);
        let layers = parse_layers(&value).unwrap();
        assert_eq!(
            layers_to_css(&layers),
            "0px 1px 2px 0px #111, inset 0px 0px 0px 2px #222"
        );
    }

    #[test]
    fn test_non_shadow_values_rejected() {
        assert!(parse_layers(&json!({"type": "blur", "x": 0, "y": 0, "blur": 0, "spread": 0, "color": "#000"})).is_none());
        assert!(parse_layers(&json!({"type": "dropShadow", "x": 0, "color": "#000"})).is_none());
        assert!(parse_layers(&json!([])).is_none());
        assert!(parse_layers(&json!([{"type": "dropShadow", "x": 0, "y": 0, "blur": 0, "spread": 0, "color": "#000"}, 3])).is_none());
        assert!(parse_layers(&json!("0px 1px #000")).is_none());
    }
}
