//! Parsing of loosely typed request fields.
//!
//! Clients send ids as numbers or numeric strings. A field counts as missing when it is
//! absent, `null`, an empty string or zero; anything else that is not a usable value is
//! malformed. Both cases are a `ValidationError`.

use serde_json::Value;

use gym_core::{CoreError, CoreResult};

/// A user identifier: any non-empty string, or an integer which is stringified.
pub fn user_id(value: Option<&Value>) -> CoreResult<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Err(CoreError::missing_fields()),
            Some(id) => Ok(id.to_string()),
            None => Err(malformed("userId")),
        },
        None | Some(Value::Null) | Some(Value::String(_)) => Err(CoreError::missing_fields()),
        Some(_) => Err(malformed("userId")),
    }
}

/// A positive row id given as a JSON integer or a numeric string.
pub fn record_id(value: Option<&Value>, field: &str) -> CoreResult<i64> {
    let id = match value {
        None | Some(Value::Null) => return Err(CoreError::missing_fields()),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(CoreError::missing_fields()),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    match id {
        Some(0) => Err(CoreError::missing_fields()),
        Some(id) if id > 0 => Ok(id),
        _ => Err(malformed(field)),
    }
}

/// A positive, finite payment amount given as a JSON number or a numeric string.
pub fn amount(value: Option<&Value>) -> CoreResult<f64> {
    let amount = match value {
        None | Some(Value::Null) => return Err(CoreError::missing_fields()),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(CoreError::missing_fields()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match amount {
        Some(a) if a == 0.0 => Err(CoreError::missing_fields()),
        Some(a) if a.is_finite() && a > 0.0 => Ok(a),
        _ => Err(malformed("amount")),
    }
}

/// A required, non-blank text field.
pub fn required_text(value: Option<&str>) -> CoreResult<&str> {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(CoreError::missing_fields()),
    }
}

fn malformed(field: &str) -> CoreError {
    CoreError::ValidationError(format!("Invalid {}", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_forms() {
        assert_eq!(user_id(Some(&json!("u1"))).unwrap(), "u1");
        assert_eq!(user_id(Some(&json!(42))).unwrap(), "42");
        assert_eq!(user_id(Some(&json!(""))), Err(CoreError::missing_fields()));
        assert_eq!(user_id(Some(&json!(0))), Err(CoreError::missing_fields()));
        assert_eq!(user_id(None), Err(CoreError::missing_fields()));
        assert!(matches!(user_id(Some(&json!({"id": 1}))), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_record_id_forms() {
        assert_eq!(record_id(Some(&json!(3)), "seasonId").unwrap(), 3);
        assert_eq!(record_id(Some(&json!("3")), "seasonId").unwrap(), 3);
        assert_eq!(record_id(Some(&Value::Null), "seasonId"), Err(CoreError::missing_fields()));
        assert_eq!(record_id(Some(&json!(0)), "seasonId"), Err(CoreError::missing_fields()));
        assert_eq!(
            record_id(Some(&json!("abc")), "seasonId"),
            Err(CoreError::ValidationError("Invalid seasonId".to_string()))
        );
        assert!(record_id(Some(&json!(-4)), "seasonId").is_err());
        assert!(record_id(Some(&json!(2.5)), "seasonId").is_err());
    }

    #[test]
    fn test_amount_forms() {
        assert_eq!(amount(Some(&json!(50.0))).unwrap(), 50.0);
        assert_eq!(amount(Some(&json!(50))).unwrap(), 50.0);
        assert_eq!(amount(Some(&json!("19.99"))).unwrap(), 19.99);
        assert_eq!(amount(Some(&json!(0))), Err(CoreError::missing_fields()));
        assert!(amount(Some(&json!(-10.0))).is_err());
        assert!(amount(Some(&json!(true))).is_err());
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(Some(" ana@example.com ")).unwrap(), "ana@example.com");
        assert!(required_text(Some("   ")).is_err());
        assert!(required_text(None).is_err());
    }
}
