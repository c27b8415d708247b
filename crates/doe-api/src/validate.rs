use serde_json::Value;

use crate::error::ApiError;

/// A present, non-blank string field. The value is returned as sent; no
/// trimming or case folding is applied.
pub fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("Field '{}' is required.", field))),
    }
}

/// A donation amount: a finite JSON number strictly greater than zero.
/// Numeric strings are refused.
pub fn amount(value: Option<Value>) -> Result<f64, ApiError> {
    value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| ApiError::Validation("Amount must be a positive number.".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(required(None, "username").is_err());
        assert!(required(Some("".into()), "username").is_err());
        assert!(required(Some("   ".into()), "username").is_err());
        assert_eq!(required(Some(" bob ".into()), "username").unwrap(), " bob ");
    }

    #[test]
    fn amount_accepts_positive_numbers() {
        assert_eq!(amount(Some(json!(5))).unwrap(), 5.0);
        assert_eq!(amount(Some(json!(0.01))).unwrap(), 0.01);
        assert_eq!(amount(Some(json!(1e9))).unwrap(), 1e9);
    }

    #[test]
    fn amount_rejects_everything_else() {
        for bad in [json!(0), json!(-3), json!(-0.0), json!("10"), json!("abc"), json!(null), json!(true), json!([1])] {
            assert!(amount(Some(bad.clone())).is_err(), "accepted {bad}");
        }
        assert!(amount(None).is_err());
    }
}
