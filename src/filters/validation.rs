// Range validation over the JSON view of a section
use crate::error::ValidationError;
use crate::filters::range::is_range_object;
use serde_json::Value;

/// Walk `value` and record every `{min, max}` object whose bounds are inverted
pub fn collect_range_errors(path: &str, value: &Value, errors: &mut Vec<ValidationError>) {
    let Value::Object(map) = value else {
        return;
    };

    if is_range_object(map) {
        let min = map.get("min").and_then(Value::as_f64);
        let max = map.get("max").and_then(Value::as_f64);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                errors.push(ValidationError::new(
                    path,
                    format!("min ({}) is greater than max ({})", min, max),
                ));
            }
        }
        return;
    }

    for (key, child) in map {
        collect_range_errors(&format!("{}.{}", path, key), child, errors);
    }
}

/// Convenience wrapper returning the collected errors
pub fn range_errors(path: &str, value: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    collect_range_errors(path, value, &mut errors);
    errors
}
