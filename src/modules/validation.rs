use serde_json::Value;

use crate::error::{AppError, AppResult};

/// 日期必须是合法的 `YYYY-MM-DD` 日历日期
/// Dates must be valid `YYYY-MM-DD` calendar dates
pub fn is_valid_date(s: &str) -> bool {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// 金额必须是非负的有限数
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

/// 可选文本字段：空字符串按缺省处理
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// 外键字段的宽松解码：数字、数字字符串按 id 处理，
/// null / 缺省 / 空字符串按"无关联"处理。
/// Lenient foreign-key decoding: empty string coerces to null.
pub fn coerce_foreign_key(field: &str, value: Option<&Value>) -> AppResult<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| AppError::validation(field, format!("{} must be an integer", field))),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::validation(field, format!("{} must be an integer", field))),
        Some(_) => Err(AppError::validation(
            field,
            format!("{} must be an integer", field),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_date_validation() {
        assert!(is_valid_date("2024-01-15"));
        assert!(!is_valid_date("2024-02-30"));
        assert!(!is_valid_date("01/15/2024"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn test_amount_validation() {
        assert!(is_valid_amount(0.0));
        assert!(is_valid_amount(350.5));
        assert!(!is_valid_amount(-1.0));
        assert!(!is_valid_amount(f64::NAN));
    }

    #[test]
    fn test_foreign_key_coercion() {
        assert_eq!(
            coerce_foreign_key("patient_id", Some(&json!(3))).unwrap(),
            Some(3)
        );
        assert_eq!(
            coerce_foreign_key("patient_id", Some(&json!("3"))).unwrap(),
            Some(3)
        );
        // 空字符串 => 无关联
        assert_eq!(
            coerce_foreign_key("patient_id", Some(&json!(""))).unwrap(),
            None
        );
        assert_eq!(coerce_foreign_key("patient_id", None).unwrap(), None);
        assert!(coerce_foreign_key("patient_id", Some(&json!("abc"))).is_err());
    }
}
