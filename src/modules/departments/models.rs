use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, FieldError};
use crate::modules::validation::is_valid_amount;

/// 科室行
/// Department row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub budget: f64,
    pub created_at: NaiveDateTime,
}

/// 科室 + 支出汇总（GET /departments/{id}/summary）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DepartmentSummary {
    pub id: i64,
    pub name: String,
    pub budget: f64,
    pub created_at: NaiveDateTime,
    pub total_expenses: f64,
    pub remaining_budget: f64,
}

/// 创建/更新科室的载荷
#[derive(Debug, Deserialize)]
pub struct DepartmentPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub budget: f64,
}

impl DepartmentPayload {
    /// 写入前验证：名称必填，预算非负
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !is_valid_amount(self.budget) {
            errors.push(FieldError::new(
                "budget",
                "Budget must be a positive number",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_budget_rejected() {
        let p = DepartmentPayload {
            name: "Oncology".to_string(),
            budget: -5.0,
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_zero_budget_allowed() {
        let p = DepartmentPayload {
            name: "Oncology".to_string(),
            budget: 0.0,
        };
        assert!(p.validate().is_ok());
    }
}
