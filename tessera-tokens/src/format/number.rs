//! Numeric text in the shape style sheets expect: integers without a fraction,
//! shortest round-trip decimals otherwise.

use serde_json::{Number, Value};

/// Render a float: `4.0` -> `4`, `0.25` -> `0.25`, `-0.0` -> `0`.
pub fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{:.0}", value);
    }
    format!("{}", value)
}

/// Render a JSON number.
pub fn number_text(number: &Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(uint) = number.as_u64() {
        return uint.to_string();
    }
    number.as_f64().map(float_text).unwrap_or_else(|| number.to_string())
}

/// Parse a finite number out of a JSON scalar the way loosely typed token
/// exports write them: numbers as-is, numeric strings after trimming.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_float_text() {
        assert_eq!(float_text(4.0), "4");
        assert_eq!(float_text(0.25), "0.25");
        assert_eq!(float_text(-0.0), "0");
        assert_eq!(float_text(-12.5), "-12.5");
    }

    #[test]
    fn test_number_text() {
        assert_eq!(number_text(&Number::from(200)), "200");
        assert_eq!(number_text(&Number::from_f64(0.4).unwrap()), "0.4");
        assert_eq!(number_text(&Number::from_f64(16.0).unwrap()), "16");
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value(&json!(8)), Some(8.0));
        assert_eq!(numeric_value(&json!(" 4 ")), Some(4.0));
        assert_eq!(numeric_value(&json!("4px")), None);
        assert_eq!(numeric_value(&json!("NaN")), None);
        assert_eq!(numeric_value(&json!(null)), None);
    }
}
