use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult, FieldError};
use crate::modules::validation::{
    coerce_foreign_key, is_valid_amount, is_valid_date, normalize_optional,
};

/// 支出行，LEFT JOIN 带出科室名称
/// Expense row, department_name joined in
///
/// `department_name` 为空时由展示端回落为 "General"。
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Expense {
    pub id: i64,
    pub department_id: Option<i64>,
    pub amount: f64,
    pub description: Option<String>,
    pub date: String,
    pub created_at: NaiveDateTime,
    pub department_name: Option<String>,
}

/// 创建/更新支出的载荷
#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    /// 数字、数字字符串或空字符串（空串 => 无关联）
    #[serde(default)]
    pub department_id: Option<Value>,
    #[serde(default)]
    pub amount: f64,
    pub description: Option<String>,
    #[serde(default)]
    pub date: String,
}

impl ExpensePayload {
    /// 写入前验证：金额非负、日期合法
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if !is_valid_amount(self.amount) {
            errors.push(FieldError::new(
                "amount",
                "Amount must be a positive number",
            ));
        }
        if !is_valid_date(&self.date) {
            errors.push(FieldError::new("date", "Valid date is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// 归属科室 id，空字符串按无关联处理
    pub fn department_id(&self) -> AppResult<Option<i64>> {
        coerce_foreign_key("department_id", self.department_id.as_ref())
    }

    pub fn description(&self) -> Option<String> {
        normalize_optional(self.description.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let p = ExpensePayload {
            department_id: Some(json!(1)),
            amount: 100.0,
            description: None,
            date: "2024-02-01".to_string(),
        };
        assert!(p.validate().is_ok());
        assert_eq!(p.department_id().unwrap(), Some(1));
    }

    #[test]
    fn test_bad_date_rejected() {
        let p = ExpensePayload {
            department_id: None,
            amount: 100.0,
            description: None,
            date: "2024-13-01".to_string(),
        };
        assert!(p.validate().is_err());
    }
}
