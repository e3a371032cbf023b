use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, FieldError};
use crate::modules::validation::{is_valid_date, normalize_optional};

/// 患者行
/// Patient row
///
/// `discharge_date` 为空表示在院（active）。
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub admission_date: Option<String>,
    pub discharge_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

/// 创建/更新患者的载荷
#[derive(Debug, Deserialize)]
pub struct PatientPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub admission_date: String,
    pub discharge_date: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl PatientPayload {
    /// 写入前验证：姓名必填，入院日期必须是合法日期
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !is_valid_date(&self.admission_date) {
            errors.push(FieldError::new(
                "admission_date",
                "Valid admission date is required",
            ));
        }
        if let Some(d) = &self.discharge_date {
            if !d.is_empty() && !is_valid_date(d) {
                errors.push(FieldError::new(
                    "discharge_date",
                    "Discharge date must be a valid date",
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// 出院日期：空字符串按未出院处理
    pub fn discharge_date(&self) -> Option<String> {
        normalize_optional(self.discharge_date.clone())
    }

    pub fn phone(&self) -> Option<String> {
        normalize_optional(self.phone.clone())
    }

    pub fn address(&self) -> Option<String> {
        normalize_optional(self.address.clone())
    }
}
