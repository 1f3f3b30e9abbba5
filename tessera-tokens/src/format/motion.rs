//! Motion group formatting: bezier curves and millisecond timings.

use super::number::{float_text, number_text, numeric_value};
use super::stringify;
use serde_json::Value;
use tessera_core::Dialect;

/// Path segments whose numbers are millisecond timings.
const TIMING_SEGMENTS: [&str; 2] = ["durations", "delays"];

/// Four control points of a `cubic-bezier()` easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCurve(pub [f64; 4]);

impl MotionCurve {
    /// An array of exactly four numbers (or numeric strings).
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 4 {
            return None;
        }
        let mut points = [0.0; 4];
        for (slot, item) in points.iter_mut().zip(items) {
            *slot = numeric_value(item)?;
        }
        Some(Self(points))
    }

    pub fn to_css(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(|p| float_text(*p)).collect();
        format!("cubic-bezier({})", parts.join(", "))
    }
}

/// Format a motion token value.
///
/// Bezier arrays become `cubic-bezier(...)`; numbers under a `durations` or `delays`
/// segment get an `ms` suffix; other scalars are written as-is; anything else falls
/// back to the CSS structural form.
pub fn format_motion_value(path: &[String], value: &Value) -> String {
    if let Some(curve) = MotionCurve::from_value(value) {
        return curve.to_css();
    }

    match value {
        Value::Number(n) => {
            let is_timing = path
                .iter()
                .any(|segment| TIMING_SEGMENTS.contains(&segment.as_str()));
            if is_timing {
                format!("{}ms", number_text(n))
            } else {
                number_text(n)
            }
        }
        Value::String(s) => s.clone(),
        other => stringify(other, Dialect::Css),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_duration_gets_ms() {
        let out = format_motion_value(&path(&["Motion", "durations", "fast"]), &json!(200));
        assert_eq!(out, "200ms");
        let out = format_motion_value(&path(&["Motion", "delays", "short"]), &json!(50));
        assert_eq!(out, "50ms");
    }

    #[test]
    fn test_plain_number_unitless() {
        let out = format_motion_value(&path(&["Motion", "scale", "pop"]), &json!(1.05));
        assert_eq!(out, "1.05");
    }

    #[test]
    fn test_bezier_curve() {
        let out = format_motion_value(&path(&["Motion", "easings", "standard"]), &json!([0.4, 0, 0.2, 1]));
        assert_eq!(out, "cubic-bezier(0.4, 0, 0.2, 1)");
    }

    #[test]
    fn test_bezier_accepts_numeric_strings() {
        let curve = MotionCurve::from_value(&json!(["0.4", "0", "0.2", "1"])).unwrap();
        assert_eq!(curve.to_css(), "cubic-bezier(0.4, 0, 0.2, 1)");
    }

    #[test]
    fn test_other_arrays_fall_back() {
        let out = format_motion_value(&path(&["Motion", "steps"]), &json!([1, 2]));
        assert_eq!(out, "[1,2]");
    }

    #[test]
    fn test_string_passthrough() {
        let out = format_motion_value(&path(&["Motion", "durations", "slow"]), &json!("0.3s"));
        assert_eq!(out, "0.3s");
    }
}
