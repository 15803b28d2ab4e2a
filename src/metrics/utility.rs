use serde_json::Value;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Loose numeric coercion of an upstream JSON value.
///
/// `None` is a missing key and yields NaN. Numbers pass through, numeric
/// strings parse after trimming (blank is 0), `null` is 0, booleans are 0/1.
/// Everything else is NaN.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    }
}

/// A rating's contribution to a sum: NaN counts as zero, everything else as itself.
pub fn contribution(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}
