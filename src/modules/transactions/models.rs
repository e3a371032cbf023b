use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult, FieldError};
use crate::modules::validation::{
    coerce_foreign_key, is_valid_amount, is_valid_date, normalize_optional,
};

/// 流水类型的合法取值：payment 计入营收，charge 计入账单
pub const TRANSACTION_TYPES: [&str; 2] = ["payment", "charge"];

/// 账务流水行，LEFT JOIN 带出患者姓名
/// Transaction row, patient_name joined in
///
/// `patient_id` 为空表示未归属（general）；
/// `patient_name` 为空可能是未归属，也可能是悬挂引用。
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub patient_id: Option<i64>,
    pub amount: f64,
    pub r#type: String,
    pub description: Option<String>,
    pub date: String,
    pub created_at: NaiveDateTime,
    pub patient_name: Option<String>,
}

/// 创建/更新流水的载荷
#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    /// 数字、数字字符串或空字符串（空串 => 无关联）
    #[serde(default)]
    pub patient_id: Option<Value>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub r#type: String,
    pub description: Option<String>,
    #[serde(default)]
    pub date: String,
}

impl TransactionPayload {
    /// 写入前验证：金额非负、类型枚举、日期合法
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if !is_valid_amount(self.amount) {
            errors.push(FieldError::new(
                "amount",
                "Amount must be a positive number",
            ));
        }
        if !TRANSACTION_TYPES.contains(&self.r#type.as_str()) {
            errors.push(FieldError::new("type", "Type must be payment or charge"));
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

    /// 归属患者 id，空字符串按无关联处理
    pub fn patient_id(&self) -> AppResult<Option<i64>> {
        coerce_foreign_key("patient_id", self.patient_id.as_ref())
    }

    pub fn description(&self) -> Option<String> {
        normalize_optional(self.description.clone())
    }
}
